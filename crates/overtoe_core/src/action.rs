//! First-class action types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. They represent
//! the player's intent and can be validated independently of execution.

use super::{Player, Position};
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a player placing their mark at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// The position where the player places their mark.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, position: Position) -> Self {
        Self { player, position }
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position)
    }
}

/// Reason a candidate move was rejected.
///
/// Every variant is recoverable: the game state is untouched and the
/// same side is asked for another move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Coordinate outside the 3x3 grid.
    #[display("Position ({}, {}) is off the board (use 0-2)", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// Classic rules: the square is already taken.
    #[display("Square {} is already occupied", _0)]
    CellOccupied(Position),

    /// Overwrite rules: the square holds the opponent's last move.
    #[display("Cannot overwrite the opponent's last move at {}", _0)]
    OverwriteForbidden(Position),

    /// The AI was asked to move on a full board.
    #[display("No move available")]
    NoMoveAvailable,

    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}
