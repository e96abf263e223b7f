//! Overtoe core - tic-tac-toe rules and computer opponent.
//!
//! Pure, synchronous game logic with no I/O. Front ends feed coordinates
//! into a [`TurnController`] and render the [`GameState`] it owns.
//!
//! # Architecture
//!
//! - **Board / GameState**: the 3x3 grid, side to move and status
//! - **Validation**: bounds, occupancy and the overwrite rule ([`validate`])
//! - **Rules**: line scan, draw and overwrite move caps ([`rules`])
//! - **AI**: random, mixed and minimax policies ([`AiEngine`])
//! - **Turn controller**: validate, apply, evaluate, hand over
//!
//! # Example
//!
//! ```
//! use overtoe_core::{GameMode, Outcome, Player, Progress, TurnController};
//!
//! let mut game = TurnController::new(GameMode::Classic);
//! for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
//!     game.submit(row, col).unwrap();
//! }
//! let progress = game.submit(0, 2).unwrap();
//! assert_eq!(progress, Progress::Finished(Outcome::Winner(Player::X)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ai;
mod contracts;
mod controller;
mod last_moves;
mod mode;
mod phases;
mod position;
mod recorder;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use ai::{AiConfig, AiEngine, Difficulty, ScoredMove, SearchResult, Searcher, WIN_SCORE};
pub use contracts::{InBounds, NotOpponentsLastMove, SquareIsEmpty, validate};
pub use controller::{Seat, TurnController};
pub use last_moves::LastMoves;
pub use mode::GameMode;
pub use phases::{Outcome, Phase, Progress};
pub use position::Position;
pub use recorder::{MemoryRecorder, MoveRecorder, NoopRecorder};
pub use types::{Board, GameState, GameStatus, Player, Square};
