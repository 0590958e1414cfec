//! Pumpwise CLI: the main entry point.
//!
//! Commands:
//! - `onboard`   Write the default config file
//! - `doctor`    Diagnose configuration
//! - `options`   List accepted values for every specification field
//! - `generate`  Suggest a pump solution for one specification
//! - `chat`      Interactive chat about the current specification

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::spec_input::SpecArgs;

#[derive(Parser)]
#[command(
    name = "pumpwise",
    about = "Pumpwise — pump selection assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Diagnose configuration and provider setup
    Doctor,

    /// List the accepted values for material, fluid, pump and seal
    Options,

    /// Generate a suggested pump solution
    Generate {
        #[command(flatten)]
        spec: SpecArgs,

        /// Also export the solution; without PATH the configured export
        /// file is used (PDF, or text for a .txt path)
        #[arg(long, value_name = "PATH")]
        export: Option<Option<PathBuf>>,
    },

    /// Chat about a pump specification
    Chat {
        #[command(flatten)]
        spec: SpecArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Options => commands::options::run().await?,
        Commands::Generate { spec, export } => commands::generate::run(spec, export).await?,
        Commands::Chat { spec } => commands::chat::run(spec).await?,
    }

    Ok(())
}
