//! Checkers CLI - Command-line driver
//!
//! Commands:
//! - play: Two players at one terminal
//! - soak: Random legal playouts to stress the rule engine
//! - config: Print or write the game configuration

mod play_cmd;
mod soak_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use checkers_core::GameConfig;

#[derive(Parser)]
#[command(name = "checkers")]
#[command(about = "Two-player checkers rule engine")]
struct Cli {
    /// Game configuration JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game at the terminal
    Play(play_cmd::PlayArgs),
    /// Play random legal games and check engine invariants
    Soak(soak_cmd::SoakArgs),
    /// Print the effective configuration, or write it to a file
    Config {
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, config),
        Commands::Soak(args) => soak_cmd::run(args, config, cli.seed),
        Commands::Config { output } => match output {
            Some(path) => {
                config.save(&path)?;
                tracing::info!("Wrote configuration to {}", path.display());
                Ok(())
            }
            None => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
        },
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => {
            let config = GameConfig::load(path)?;
            tracing::debug!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(GameConfig::default()),
    }
}
