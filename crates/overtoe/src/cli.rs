//! Command-line interface for overtoe.

use clap::{Args, Parser, Subcommand, ValueEnum};
use overtoe_core::{Difficulty, GameMode, Player};
use std::path::PathBuf;

/// Overtoe - tic-tac-toe with an overwrite variant and a minimax opponent
#[derive(Parser, Debug)]
#[command(name = "overtoe")]
#[command(about = "Terminal tic-tac-toe with overwrite rules and game history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = "overtoe.toml")]
    pub config: PathBuf,

    /// Database path (overrides the config file)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play(PlayArgs),

    /// Create an account
    Register(Credentials),

    /// List recent games
    History {
        #[command(flatten)]
        credentials: Credentials,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Only list games of this mode (classic, overwrite, ai_easy, ai_medium, ai_hard)
        #[arg(long)]
        mode: Option<GameMode>,
    },

    /// Show win/loss statistics
    Stats(Credentials),

    /// Step through a stored game
    Replay {
        #[command(flatten)]
        credentials: Credentials,

        /// Game id, as shown by `history`
        #[arg(long)]
        game: i32,
    },

    /// Delete every game of an account, keeping the account
    ClearHistory(Credentials),

    /// Delete an account and all of its games
    DeleteUser(Credentials),
}

/// Username and password pair.
#[derive(Args, Debug, Clone)]
pub struct Credentials {
    /// Username
    #[arg(short, long)]
    pub user: String,

    /// Password
    #[arg(short, long)]
    pub password: String,
}

/// Options for `play`.
#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Rule set
    #[arg(short, long, value_enum, default_value_t = ModeArg::Classic)]
    pub mode: ModeArg,

    /// AI difficulty (ai mode only)
    #[arg(short, long, default_value = "hard")]
    pub difficulty: Difficulty,

    /// Side played by you (or --user); X moves first
    #[arg(short, long, default_value = "X", value_parser = parse_symbol)]
    pub symbol: Player,

    /// Account to record the game under
    #[arg(short, long, requires = "password")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(short, long)]
    pub password: Option<String>,

    /// Second account, for two-player modes
    #[arg(long, requires = "opponent_password")]
    pub opponent: Option<String>,

    /// Password for --opponent
    #[arg(long)]
    pub opponent_password: Option<String>,
}

/// Rule set as typed on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Occupied cells are final
    Classic,
    /// Any cell but the opponent's last move may be taken
    Overwrite,
    /// Play against the computer
    Ai,
}

impl PlayArgs {
    /// Resolves the game mode, folding in the difficulty for AI games.
    pub fn game_mode(&self) -> GameMode {
        match self.mode {
            ModeArg::Classic => GameMode::Classic,
            ModeArg::Overwrite => GameMode::Overwrite,
            ModeArg::Ai => GameMode::ai(self.difficulty),
        }
    }
}

fn parse_symbol(s: &str) -> Result<Player, String> {
    let mut chars = s.chars();
    match (chars.next().and_then(Player::from_symbol), chars.next()) {
        (Some(player), None) => Ok(player),
        _ => Err(format!("expected X or O, got '{}'", s)),
    }
}
