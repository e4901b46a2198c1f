//! Import command: parameter store path into a Kubernetes secret

use anyhow::{Context, Result};
use ssm_secret_core::{ClusterConfig, SecretKind, StoreConfig, SyncOptions};
use ssm_secret_sync::ImportOutcome;

use crate::cli::ImportArgs;
use crate::output;

pub async fn run(args: ImportArgs, store: &StoreConfig, cluster: &ClusterConfig) -> Result<()> {
    let engine = super::connect(store, cluster, options(&args), true).await?;

    let outcome = engine.import(&args.name).await.with_context(|| {
        format!(
            "Failed to import {} into secret {}",
            args.ssm_path, args.name
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        report(&outcome);
    }
    Ok(())
}

fn options(args: &ImportArgs) -> SyncOptions {
    let kind = if args.tls {
        SecretKind::Tls
    } else {
        SecretKind::Opaque
    };
    SyncOptions::new(args.ssm_path.clone())
        .with_overwrite(args.overwrite)
        .with_codec(args.decode)
        .with_kind(kind)
}

fn report(outcome: &ImportOutcome) {
    for warning in &outcome.warnings {
        output::warning(&format!(
            "{}: {}, imported as plain text",
            warning.key, warning.message
        ));
    }
    output::success(&format!(
        "Secret {}/{} {} from {} ({} keys)",
        outcome.namespace,
        outcome.name,
        outcome.action,
        outcome.path,
        outcome.keys.len()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tls: bool, decode: bool) -> ImportArgs {
        ImportArgs {
            name: "foo".to_string(),
            ssm_path: "/foo".to_string(),
            overwrite: true,
            decode,
            tls,
            json: false,
        }
    }

    #[test]
    fn test_options_from_flags() {
        let opts = options(&args(true, true));
        assert_eq!(opts.path, "/foo");
        assert_eq!(opts.kind, SecretKind::Tls);
        assert!(opts.overwrite);
        assert!(opts.codec);
        assert!(!opts.allow_large_value);
    }

    #[test]
    fn test_options_default_to_opaque() {
        let opts = options(&args(false, false));
        assert_eq!(opts.kind, SecretKind::Opaque);
        assert!(!opts.codec);
    }
}
