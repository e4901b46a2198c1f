//! kubectl-ssm-secret - move secrets between SSM Parameter Store and Kubernetes
//!
//! Installed on the PATH, it also runs as `kubectl ssm-secret`.

mod cli;
mod commands;
mod output;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);
    output::set_quiet(cli.quiet);

    let store = cli.store_config();
    let cluster = cli.cluster_config();

    match cli.command {
        Commands::Version(args) => commands::version::run(args, &cluster).await,
        Commands::Import(args) => commands::import::run(args, &store, &cluster).await,
        Commands::Export(args) => commands::export::run(args, &store, &cluster).await,
        Commands::List(args) => commands::list::run(args, &store, &cluster).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
