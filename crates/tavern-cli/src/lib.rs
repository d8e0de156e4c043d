//! tavern command-line interface.

pub mod commands;
pub mod input;
pub mod render;
pub mod repl;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tavern_core::TavernConfig;

/// tavern - talk to a tabletop NPC and query its rules
#[derive(Parser)]
#[command(name = "tavern")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "TAVERN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Talk to an NPC
    Chat(commands::chat::ChatArgs),

    /// Build an embeddings index from a rules file
    Build(commands::build::BuildArgs),

    /// Query a rules index and compose a grounded prompt
    Query(commands::query::QueryArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Log filter used when neither `-v` nor an environment filter is given.
pub const DEFAULT_LOG_FILTER: &str = "tavern=warn";

/// Filter directive for a `-v` count, if any flags were given.
pub fn verbosity_filter(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("tavern=info"),
        _ => Some("tavern=debug"),
    }
}

/// Resolve the startup configuration: file, then environment overrides.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TavernConfig> {
    TavernConfig::resolve(explicit).context("Failed to load configuration")
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Chat(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::chat::run(args, config).await
        }
        Commands::Build(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::build::run(args, config).await
        }
        Commands::Query(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::query::run(args, config).await
        }
        Commands::Config(args) => commands::config::run(args, cli.config.as_deref()).await,
        Commands::Version => {
            println!("tavern {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
