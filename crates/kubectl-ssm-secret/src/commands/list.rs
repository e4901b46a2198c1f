//! List command: read-only view of store paths and secrets

use anyhow::{bail, Context, Result};
use ssm_secret_core::{ClusterConfig, StoreConfig, SyncOptions};
use ssm_secret_sync::Listing;

use crate::cli::ListArgs;
use crate::output;

pub async fn run(args: ListArgs, store: &StoreConfig, cluster: &ClusterConfig) -> Result<()> {
    let paths = args.all_paths();
    if paths.is_empty() && args.secrets.is_empty() {
        bail!("Nothing to list: give a parameter store path or --secret <name>");
    }

    let options = SyncOptions::default().with_codec(args.decode);
    let uses_secrets = !args.secrets.is_empty();
    let engine = super::connect(store, cluster, options, uses_secrets).await?;

    let listings = engine
        .list(&paths, &args.secrets)
        .await
        .context("Failed to list secrets")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
    } else {
        render(&listings);
    }
    Ok(())
}

fn render(listings: &[Listing]) {
    if listings.is_empty() {
        output::note("No values found");
        return;
    }
    for listing in listings {
        output::section(&listing.source.to_string());
        output::entries(listing.data.iter());
    }
}
