//! Roster CLI - collection image classification and list maintenance.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "roster")]
#[command(
    author,
    version,
    about = "Classify collection images against reference signatures",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one full classification run against the configured collection
    Run {
        /// Compute the publish decision but do not publish
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the perceptual signature of a local image
    Hash {
        /// Path to the image file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit a reference-file entry with this name instead of bare hex
        #[arg(long)]
        name: Option<String>,
    },

    /// Classify a local image against the reference file
    Check {
        /// Path to the image file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("roster=info,roster_core=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dry_run } => commands::run::execute(dry_run).await,
        Commands::Hash { file, name } => commands::hash::execute(file, name),
        Commands::Check { file } => commands::check::execute(file),
    }
}
