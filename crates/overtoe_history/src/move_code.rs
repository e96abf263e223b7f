//! Compact move codes used in stored game history.
//!
//! One move is the side symbol followed by the row and column digits
//! (`X01`); a game is its codes joined with commas (`X11,O00,X22`).

use crate::MoveCodeError;
use overtoe_core::{Move, Player, Position};
use tracing::instrument;

/// Encodes one move.
pub fn encode_move(action: &Move) -> String {
    format!(
        "{}{}{}",
        action.player.symbol(),
        action.position.row(),
        action.position.col()
    )
}

/// Decodes one move.
///
/// # Errors
///
/// Returns [`MoveCodeError`] unless `code` is exactly a side symbol and two
/// digits in 0-2.
pub fn decode_move(code: &str) -> Result<Move, MoveCodeError> {
    let mut chars = code.trim().chars();
    let parsed = match (chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some(side), Some(row), Some(col), None) => {
            let player = Player::from_symbol(side);
            let position = row
                .to_digit(10)
                .zip(col.to_digit(10))
                .and_then(|(r, c)| Position::new(r as usize, c as usize));
            player.zip(position).map(|(p, pos)| Move::new(p, pos))
        }
        _ => None,
    };
    parsed.ok_or_else(|| MoveCodeError::new(code))
}

/// Encodes a whole game.
pub fn encode_moves(moves: &[Move]) -> String {
    moves.iter().map(encode_move).collect::<Vec<_>>().join(",")
}

/// Decodes a whole game. An empty string is a game with no moves.
///
/// # Errors
///
/// Returns the first code that fails to decode.
#[instrument]
pub fn decode_moves(moves: &str) -> Result<Vec<Move>, MoveCodeError> {
    if moves.trim().is_empty() {
        return Ok(Vec::new());
    }
    moves.split(',').map(decode_move).collect()
}
