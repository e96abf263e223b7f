//! Terminal-state evaluation after an accepted move.

use super::{has_win, is_full};
use crate::{Board, GameMode, Outcome, Player};
use tracing::{debug, instrument};

/// Overwrite games cannot end in a draw before this many moves.
pub const OVERWRITE_DRAW_FLOOR: usize = 6;

/// Overwrite games stop after this many moves.
pub const OVERWRITE_MOVE_LIMIT: usize = 50;

/// Decides whether the move just made by `mover` ended the game.
///
/// `move_count` counts accepted moves including the one just made. The win
/// test runs before the draw test; a move can only complete a line for the
/// side that made it.
#[instrument(skip(board))]
pub fn evaluate(
    board: &Board,
    mover: Player,
    mode: GameMode,
    move_count: usize,
) -> Option<Outcome> {
    if has_win(board, mover) {
        debug!(%mover, "Line completed");
        return Some(Outcome::Winner(mover));
    }

    if mode.allows_overwrite() {
        if move_count >= OVERWRITE_DRAW_FLOOR && is_full(board) {
            return Some(Outcome::Draw);
        }
        if move_count >= OVERWRITE_MOVE_LIMIT {
            debug!(move_count, "Overwrite move cap reached");
            return Some(Outcome::MoveLimit);
        }
        return None;
    }

    is_full(board).then_some(Outcome::Draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn full_drawn_board() -> Board {
        // X O X / O X X / O X O
        #[rustfmt::skip]
        let marks = [
            Player::X, Player::O, Player::X,
            Player::O, Player::X, Player::X,
            Player::O, Player::X, Player::O,
        ];
        Position::ALL
            .iter()
            .zip(marks)
            .fold(Board::new(), |b, (pos, p)| b.with(*pos, p))
    }

    #[test]
    fn test_classic_full_board_draws() {
        let board = full_drawn_board();
        assert_eq!(evaluate(&board, Player::X, GameMode::Classic, 9), Some(Outcome::Draw));
    }

    #[test]
    fn test_overwrite_draw_needs_floor() {
        let board = full_drawn_board();
        assert_eq!(evaluate(&board, Player::X, GameMode::Overwrite, 5), None);
        assert_eq!(
            evaluate(&board, Player::X, GameMode::Overwrite, OVERWRITE_DRAW_FLOOR),
            Some(Outcome::Draw)
        );
    }

    #[test]
    fn test_overwrite_move_limit() {
        let board = Board::new().with(Position::ALL[0], Player::X);
        assert_eq!(evaluate(&board, Player::X, GameMode::Overwrite, 49), None);
        assert_eq!(
            evaluate(&board, Player::X, GameMode::Overwrite, OVERWRITE_MOVE_LIMIT),
            Some(Outcome::MoveLimit)
        );
    }

    #[test]
    fn test_win_beats_move_limit() {
        let board = [0, 1, 2]
            .iter()
            .fold(Board::new(), |b, i| b.with(Position::ALL[*i], Player::O));
        assert_eq!(
            evaluate(&board, Player::O, GameMode::Overwrite, OVERWRITE_MOVE_LIMIT),
            Some(Outcome::Winner(Player::O))
        );
    }
}
