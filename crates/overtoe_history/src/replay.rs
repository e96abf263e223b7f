//! Step-by-step reconstruction of a stored game.

use crate::{MoveCodeError, decode_moves};
use overtoe_core::rules::check_winner;
use overtoe_core::{Board, Move, Player};
use tracing::{debug, instrument};

/// Board snapshots after every move of a recorded game.
///
/// Frame 0 is the empty board; frame `n` is the board after `n` moves.
/// Overwrite games replay faithfully because each move simply takes its
/// square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    moves: Vec<Move>,
    frames: Vec<Board>,
}

impl Replay {
    /// Builds a replay from decoded moves.
    pub fn new(moves: Vec<Move>) -> Self {
        let mut frames = Vec::with_capacity(moves.len() + 1);
        let mut board = Board::new();
        frames.push(board);
        for action in &moves {
            board = board.with(action.position, action.player);
            frames.push(board);
        }
        Self { moves, frames }
    }

    /// Builds a replay from a comma-joined move-code string.
    ///
    /// # Errors
    ///
    /// Returns [`MoveCodeError`] on the first malformed code.
    #[instrument]
    pub fn parse(moves: &str) -> Result<Self, MoveCodeError> {
        let replay = Self::new(decode_moves(moves)?);
        debug!(steps = replay.len(), "Replay built");
        Ok(replay)
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True if the game has no moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The recorded moves.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Board after `step` moves, or `None` past the end.
    pub fn frame(&self, step: usize) -> Option<&Board> {
        self.frames.get(step)
    }

    /// Board after the last move.
    pub fn final_board(&self) -> &Board {
        self.frames.last().unwrap_or(&self.frames[0])
    }

    /// Side holding a completed line on the final board.
    pub fn winner(&self) -> Option<Player> {
        check_winner(self.final_board())
    }
}
