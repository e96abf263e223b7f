//! Most recent move per side, consulted by the overwrite rule.

use super::{Player, Position};
use serde::{Deserialize, Serialize};

/// The last square each side played in the current game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMoves {
    x: Option<Position>,
    o: Option<Position>,
}

impl LastMoves {
    /// Both moves unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last square played by `player`.
    pub fn of(&self, player: Player) -> Option<Position> {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    /// Records a successful move.
    pub fn record(&mut self, player: Player, pos: Position) {
        match player {
            Player::X => self.x = Some(pos),
            Player::O => self.o = Some(pos),
        }
    }

    /// Forgets both moves.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
