//! Export command: Kubernetes secret into a parameter store path

use anyhow::{Context, Result};
use ssm_secret_core::{ClusterConfig, StoreConfig, SyncOptions};
use ssm_secret_sync::ExportOutcome;

use crate::cli::ExportArgs;
use crate::output;

pub async fn run(args: ExportArgs, store: &StoreConfig, cluster: &ClusterConfig) -> Result<()> {
    let engine = super::connect(store, cluster, options(&args), true).await?;

    let outcome = engine.export(&args.name).await.with_context(|| {
        format!(
            "Failed to export secret {} to {}",
            args.name, args.ssm_path
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        report(&outcome);
    }
    Ok(())
}

fn options(args: &ExportArgs) -> SyncOptions {
    SyncOptions::new(args.ssm_path.clone())
        .with_overwrite(args.overwrite)
        .with_codec(args.encode)
        .with_allow_large_value(args.advanced)
}

fn report(outcome: &ExportOutcome) {
    let rows: Vec<(&str, String)> = outcome
        .report
        .written
        .iter()
        .map(|w| {
            (
                w.name.as_str(),
                format!("version {} ({} tier)", w.version, w.tier),
            )
        })
        .collect();
    output::entries(rows.iter().map(|(name, detail)| (*name, detail.as_str())));
    for key in &outcome.report.skipped {
        output::warning(&format!("{}: empty value, not written", key));
    }
    output::success(&format!(
        "Secret {}/{} exported to {} ({} keys)",
        outcome.namespace,
        outcome.name,
        outcome.path,
        outcome.report.written.len()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_flags() {
        let args = ExportArgs {
            name: "foo".to_string(),
            ssm_path: "/foo".to_string(),
            overwrite: false,
            encode: true,
            advanced: true,
            json: false,
        };

        let opts = options(&args);
        assert_eq!(opts.path, "/foo");
        assert!(opts.codec);
        assert!(opts.allow_large_value);
        assert!(!opts.overwrite);
    }
}
