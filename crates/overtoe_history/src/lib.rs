//! Accounts, game history and replay for overtoe.
//!
//! Games are stored in SQLite through [`GameRepository`]. A
//! [`HistoryRecorder`] plugs into the turn controller and saves each
//! finished game that had a registered participant:
//!
//! ```no_run
//! use overtoe_core::{GameMode, TurnController};
//! use overtoe_history::{GameRepository, HistoryRecorder, Participant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = GameRepository::open("overtoe.db".to_string())?;
//! let alice = repo.register("alice", "hunter2")?;
//! let recorder = HistoryRecorder::new(repo, Participant::User(*alice.id()), Participant::Guest);
//! let mut game = TurnController::new(GameMode::Classic).with_recorder(recorder);
//! game.submit(1, 1)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod models;
mod move_code;
mod password;
mod recorder;
mod replay;
mod repository;
mod schema;

pub use error::{AccountError, DbError, MoveCodeError};
pub use models::{GameRecord, GameSummary, NewGameRecord, NewUser, StoredOutcome, User, UserStats};
pub use move_code::{decode_move, decode_moves, encode_move, encode_moves};
pub use password::{MIN_PASSWORD_LEN, hash_password};
pub use recorder::{HistoryRecorder, Participant};
pub use replay::Replay;
pub use repository::{GameRepository, HISTORY_LIMIT};
