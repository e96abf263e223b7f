//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position, Square};
use tracing::instrument;

/// The 8 lines as row-major board indices.
#[rustfmt::skip]
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],             // Diagonals
];

fn line_owner(board: &Board, line: [usize; 3]) -> Option<Player> {
    let [a, b, c] = line.map(|i| board.get(Position::ALL[i]));
    match a {
        Square::Occupied(player) if a == b && b == c => Some(player),
        _ => None,
    }
}

/// True iff `side` holds all three squares of some line.
///
/// Only `side` is examined; callers that care about both sides ask twice.
#[instrument(level = "trace", skip(board))]
pub fn has_win(board: &Board, side: Player) -> bool {
    LINES
        .iter()
        .any(|line| line_owner(board, *line) == Some(side))
}

/// Checks if there is a winner on the board.
///
/// Returns the owner of the first completed line in [`LINES`] order.
#[instrument(level = "trace", skip(board))]
pub fn check_winner(board: &Board) -> Option<Player> {
    LINES.iter().find_map(|line| line_owner(board, *line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(marks: &[(usize, Player)]) -> Board {
        marks
            .iter()
            .fold(Board::new(), |board, (i, p)| board.with(Position::ALL[*i], *p))
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
        assert!(!has_win(&board, Player::X));
        assert!(!has_win(&board, Player::O));
    }

    #[test]
    fn test_single_mark_never_wins() {
        for pos in Position::ALL {
            let board = Board::new().with(pos, Player::X);
            assert!(!has_win(&board, Player::X));
        }
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            let board = board_with(&line.map(|i| (i, Player::O)));
            assert!(has_win(&board, Player::O), "line {:?}", line);
            assert!(!has_win(&board, Player::X));
            assert_eq!(check_winner(&board), Some(Player::O));
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_with(&[(0, Player::X), (1, Player::O), (2, Player::X)]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_diagonal() {
        let board = board_with(&[(2, Player::X), (4, Player::X), (6, Player::X)]);
        assert!(has_win(&board, Player::X));
    }
}
