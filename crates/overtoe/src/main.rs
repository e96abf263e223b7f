//! Overtoe - terminal tic-tac-toe
//!
//! Classic and overwrite rules, a minimax opponent, and per-account game
//! history stored in SQLite.

#![warn(missing_docs)]

mod cli;
mod commands;
mod config;
mod play;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::AppConfig;
use overtoe_history::GameRepository;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(db_path) = cli.db_path {
        config = config.with_db_path(db_path);
    }
    debug!(?config, "Configuration resolved");

    let repo = GameRepository::open(config.db_path().clone())?;
    let stdout = std::io::stdout();

    match cli.command {
        Command::Play(args) => {
            info!(mode = %args.game_mode(), "Starting game");
            let stdin = std::io::stdin();
            commands::play(repo, config.ai_config(), &args, stdin.lock(), stdout.lock())?;
            Ok(())
        }
        Command::Register(credentials) => commands::register(&repo, &credentials, stdout.lock()),
        Command::History {
            credentials,
            json,
            mode,
        } => commands::history(&repo, &credentials, json, mode, stdout.lock()),
        Command::Stats(credentials) => commands::stats(&repo, &credentials, stdout.lock()),
        Command::Replay { credentials, game } => {
            commands::replay(&repo, &credentials, game, stdout.lock())
        }
        Command::ClearHistory(credentials) => {
            commands::clear_history(&repo, &credentials, stdout.lock())
        }
        Command::DeleteUser(credentials) => {
            commands::delete_user(&repo, &credentials, stdout.lock())
        }
    }
}

/// Installs the stderr subscriber, honoring `RUST_LOG`.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("overtoe=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
