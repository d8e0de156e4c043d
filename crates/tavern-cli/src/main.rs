//! tavern CLI entry point.

use clap::Parser;
use tavern_cli::{run, verbosity_filter, Cli, DEFAULT_LOG_FILTER};
use tavern_core::env::{get_var, vars};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = match verbosity_filter(cli.verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => get_var(vars::TAVERN_LOG)
            .map(EnvFilter::new)
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Run the command
    run(cli).await
}
