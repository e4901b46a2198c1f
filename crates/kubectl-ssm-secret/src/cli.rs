//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use ssm_secret_core::{ClusterConfig, StoreConfig};
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  # view the keys and values stored at parameter store path /param/path/foo
  kubectl ssm-secret list /param/path/foo

  # import to a kubernetes secret called foo from parameter store path /param/path/foo
  kubectl ssm-secret import foo --ssm-path /param/path/foo

  # export a kubernetes secret called foo to parameter store path /param/path/foo
  kubectl ssm-secret export foo --ssm-path /param/path/foo";

/// Import and export Kubernetes secrets from AWS SSM Parameter Store
#[derive(Parser, Debug)]
#[command(name = "kubectl-ssm-secret", bin_name = "kubectl ssm-secret")]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Kubernetes namespace (defaults to the kubeconfig's current namespace)
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// kubeconfig context to use
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// AWS region (overrides AWS_REGION and AWS_DEFAULT_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Custom SSM endpoint, e.g. LocalStack (overrides AWS_ENDPOINT_URL_SSM)
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parameter store client settings: flags over environment over defaults
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::from_env()
            .with_region(self.region.clone())
            .with_endpoint(self.endpoint_url.clone())
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            namespace: self.namespace.clone(),
            context: self.context.clone(),
            kubeconfig: self.kubeconfig.clone(),
            ..ClusterConfig::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Import a secret from a parameter store path
    Import(ImportArgs),

    /// Export a secret to a parameter store path
    Export(ExportArgs),

    /// List values at parameter store paths and in secrets
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Name of the Kubernetes secret to create or update
    pub name: String,

    /// Parameter store path to read data from
    #[arg(long, env = "SSM_SECRET_PATH")]
    pub ssm_path: String,

    /// Overwrite the values of an existing secret
    #[arg(long)]
    pub overwrite: bool,

    /// Treat parameter store values as gzipped, base64 encoded strings
    #[arg(long)]
    pub decode: bool,

    /// Create a kubernetes.io/tls secret
    #[arg(long)]
    pub tls: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Name of the Kubernetes secret to read
    pub name: String,

    /// Parameter store path to write data to
    #[arg(long, env = "SSM_SECRET_PATH")]
    pub ssm_path: String,

    /// Overwrite existing parameters
    #[arg(long)]
    pub overwrite: bool,

    /// Gzip and base64 encode values before writing
    #[arg(long)]
    pub encode: bool,

    /// Allow values up to 8 KiB (advanced parameter tier)
    #[arg(long)]
    pub advanced: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Parameter store paths to list
    pub paths: Vec<String>,

    /// Parameter store path to list, listed before positional paths
    #[arg(long)]
    pub ssm_path: Option<String>,

    /// Kubernetes secrets to list (repeatable)
    #[arg(long = "secret", value_name = "NAME")]
    pub secrets: Vec<String>,

    /// Decode gzipped, base64 encoded parameter store values
    #[arg(long)]
    pub decode: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Store paths in listing order
    pub fn all_paths(&self) -> Vec<String> {
        self.ssm_path
            .iter()
            .chain(self.paths.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kubectl-ssm-secret").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    #[serial]
    fn test_parse_import() {
        std::env::remove_var("SSM_SECRET_PATH");
        let cli = parse(&[
            "import",
            "foo",
            "--ssm-path",
            "/foo",
            "--overwrite",
            "--decode",
            "--tls",
            "-n",
            "apps",
        ]);

        assert_eq!(cli.namespace.as_deref(), Some("apps"));
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.name, "foo");
                assert_eq!(args.ssm_path, "/foo");
                assert!(args.overwrite && args.decode && args.tls);
            }
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_parse_export_advanced() {
        std::env::remove_var("SSM_SECRET_PATH");
        let cli = parse(&["-vv", "export", "foo", "--ssm-path", "/foo", "--advanced"]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Export(args) => {
                assert!(args.advanced);
                assert!(!args.encode);
            }
            other => panic!("expected export, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_ssm_path_required() {
        std::env::remove_var("SSM_SECRET_PATH");
        let result = Cli::try_parse_from(["kubectl-ssm-secret", "import", "foo"]);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_ssm_path_from_env() {
        std::env::set_var("SSM_SECRET_PATH", "/from/env");
        let cli = parse(&["export", "foo"]);
        std::env::remove_var("SSM_SECRET_PATH");

        match cli.command {
            Commands::Export(args) => assert_eq!(args.ssm_path, "/from/env"),
            other => panic!("expected export, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_sources_in_order() {
        let cli = parse(&[
            "list",
            "/a",
            "/b",
            "--ssm-path",
            "/first",
            "--secret",
            "one",
            "--secret",
            "two",
        ]);

        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.all_paths(), vec!["/first", "/a", "/b"]);
                assert_eq!(args.secrets, vec!["one", "two"]);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_store_config_flags_override_env() {
        std::env::set_var("AWS_REGION", "us-east-1");
        let cli = parse(&["--region", "eu-west-1", "version"]);
        let store = cli.store_config();
        std::env::remove_var("AWS_REGION");

        assert_eq!(store.region, "eu-west-1");
    }

    #[test]
    fn test_cluster_config_from_flags() {
        let cli = parse(&["--context", "prod", "-n", "apps", "version"]);
        let cluster = cli.cluster_config();

        assert_eq!(cluster.context.as_deref(), Some("prod"));
        assert_eq!(cluster.namespace.as_deref(), Some("apps"));
        assert_eq!(cluster.kubectl, "kubectl");
    }
}
