//! Game outcomes and turn-controller phases.

use super::Player;
use serde::{Deserialize, Serialize};

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won the game.
    Winner(Player),
    /// Game ended in a draw.
    Draw,
    /// Overwrite game stopped at its move cap. Neither a win nor a draw.
    MoveLimit,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw | Outcome::MoveLimit => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::MoveLimit => write!(f, "Move limit reached"),
        }
    }
}

/// Where the turn controller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the active side to move.
    AwaitingMove,
    /// A move was applied and is being scored.
    Evaluating,
    /// Game over; only a reset leaves this phase.
    Terminal(Outcome),
}

/// What happened after an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    /// Game continues with `next` to move.
    Continue {
        /// Side now on move.
        next: Player,
    },
    /// Game ended.
    Finished(Outcome),
}
