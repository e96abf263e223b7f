//! Move validation as composable preconditions.
//!
//! Each precondition is a pure check over the current board. None of them
//! mutate state; the turn controller applies a move only after
//! [`validate`] accepts it.

use super::action::MoveError;
use super::{Board, GameMode, LastMoves, Player, Position};
use tracing::{instrument, warn};

/// Precondition: the coordinates name a cell on the board.
pub struct InBounds;

impl InBounds {
    /// Converts raw coordinates into a checked [`Position`].
    #[instrument]
    pub fn check(row: usize, col: usize) -> Result<Position, MoveError> {
        Position::new(row, col).ok_or(MoveError::OutOfBounds { row, col })
    }
}

/// Precondition (classic rules): the square is empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Fails with [`MoveError::CellOccupied`] if `pos` is taken.
    #[instrument(skip(board))]
    pub fn check(pos: Position, board: &Board) -> Result<(), MoveError> {
        if board.is_empty(pos) {
            Ok(())
        } else {
            Err(MoveError::CellOccupied(pos))
        }
    }
}

/// Precondition (overwrite rules): the square is not the opponent's
/// most recent move.
///
/// A side may re-target its own last move.
pub struct NotOpponentsLastMove;

impl NotOpponentsLastMove {
    /// Fails with [`MoveError::OverwriteForbidden`] on the opponent's last square.
    #[instrument(skip(last_moves))]
    pub fn check(pos: Position, mover: Player, last_moves: &LastMoves) -> Result<(), MoveError> {
        if last_moves.of(mover.opponent()) == Some(pos) {
            Err(MoveError::OverwriteForbidden(pos))
        } else {
            Ok(())
        }
    }
}

/// Validates a candidate move for `mover` under `mode`.
///
/// Bounds are checked first. Classic and AI modes then require an empty
/// square; overwrite mode accepts any square except the opponent's last
/// move.
///
/// # Errors
///
/// Returns the first failed precondition as a [`MoveError`].
#[instrument(skip(board, last_moves))]
pub fn validate(
    board: &Board,
    mover: Player,
    row: usize,
    col: usize,
    mode: GameMode,
    last_moves: &LastMoves,
) -> Result<Position, MoveError> {
    let pos = InBounds::check(row, col)?;

    let verdict = if mode.allows_overwrite() {
        NotOpponentsLastMove::check(pos, mover, last_moves)
    } else {
        SquareIsEmpty::check(pos, board)
    };

    if let Err(reason) = verdict {
        warn!(%mover, %pos, %reason, "Move rejected");
        return Err(reason);
    }

    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_bounds_checked_first() {
        let board = Board::new();
        let last = LastMoves::new();
        for mode in [GameMode::Classic, GameMode::Overwrite, GameMode::AiHard] {
            assert_eq!(
                validate(&board, Player::X, 3, 1, mode, &last),
                Err(MoveError::OutOfBounds { row: 3, col: 1 })
            );
        }
    }

    #[test]
    fn test_classic_rejects_occupied() {
        let board = Board::new().with(pos(1, 1), Player::X);
        let last = LastMoves::new();
        assert_eq!(
            validate(&board, Player::O, 1, 1, GameMode::Classic, &last),
            Err(MoveError::CellOccupied(pos(1, 1)))
        );
        assert_eq!(
            validate(&board, Player::O, 0, 0, GameMode::Classic, &last),
            Ok(pos(0, 0))
        );
    }

    #[test]
    fn test_overwrite_forbids_opponents_last_move_only() {
        let board = Board::new()
            .with(pos(0, 0), Player::X)
            .with(pos(1, 1), Player::O);
        let mut last = LastMoves::new();
        last.record(Player::X, pos(0, 0));
        last.record(Player::O, pos(1, 1));

        assert_eq!(
            validate(&board, Player::X, 1, 1, GameMode::Overwrite, &last),
            Err(MoveError::OverwriteForbidden(pos(1, 1)))
        );
        assert_eq!(
            validate(&board, Player::X, 0, 0, GameMode::Overwrite, &last),
            Ok(pos(0, 0))
        );
    }

    #[test]
    fn test_overwrite_allows_older_opponent_squares() {
        let board = Board::new()
            .with(pos(0, 0), Player::O)
            .with(pos(2, 2), Player::O);
        let mut last = LastMoves::new();
        last.record(Player::O, pos(2, 2));

        assert_eq!(
            validate(&board, Player::X, 0, 0, GameMode::Overwrite, &last),
            Ok(pos(0, 0))
        );
    }
}
