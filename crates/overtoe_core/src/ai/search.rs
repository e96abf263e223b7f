//! Exhaustive minimax search with alpha-beta pruning.
//!
//! The tree is searched to terminal positions every time: with at most nine
//! empty squares there is nothing to cut off. Each branch works on its own
//! copy of the board, so pruning can return early without restoring state.

use crate::rules::has_win;
use crate::{Board, Player, Position};
use tracing::{debug, instrument};

/// Score of an immediate win, before depth adjustment.
pub const WIN_SCORE: i32 = 10;

/// Bound outside any reachable score.
const INF: i32 = 1000;

/// A candidate move with its minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    /// Square to play.
    pub position: Position,
    /// Minimax value from the AI's point of view.
    pub score: i32,
}

/// Result of a root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found, or `None` on a full board.
    pub best: Option<ScoredMove>,
    /// Positions visited.
    pub nodes: u64,
}

/// Minimax searcher for one side.
#[derive(Debug)]
pub struct Searcher {
    ai: Player,
    opponent: Player,
    nodes: u64,
}

impl Searcher {
    /// Creates a searcher that maximizes for `ai`.
    pub fn new(ai: Player, opponent: Player) -> Self {
        Self {
            ai,
            opponent,
            nodes: 0,
        }
    }

    /// Finds the best move for the AI side on `board`.
    ///
    /// Every root move is searched with a full window so its score is exact.
    /// Ties keep the first move in row-major order.
    #[instrument(skip(self, board), fields(ai = %self.ai))]
    pub fn search(&mut self, board: &Board) -> SearchResult {
        self.nodes = 0;
        let mut best: Option<ScoredMove> = None;

        for position in Position::empty_cells(board) {
            let score = self.minimax(&board.with(position, self.ai), 0, false, -INF, INF);
            if best.is_none_or(|b| score > b.score) {
                best = Some(ScoredMove { position, score });
            }
        }

        debug!(nodes = self.nodes, best = ?best, "Search complete");
        SearchResult {
            best,
            nodes: self.nodes,
        }
    }

    /// Terminal score, or `None` if play continues.
    ///
    /// Faster wins and slower losses score better.
    fn terminal_score(&self, board: &Board, depth: i32) -> Option<i32> {
        if has_win(board, self.ai) {
            Some(WIN_SCORE - depth)
        } else if has_win(board, self.opponent) {
            Some(depth - WIN_SCORE)
        } else if board.is_full() {
            Some(0)
        } else {
            None
        }
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if let Some(score) = self.terminal_score(board, depth) {
            return score;
        }

        if maximizing {
            let mut best = -INF;
            for pos in Position::empty_cells(board) {
                let child = board.with(pos, self.ai);
                best = best.max(self.minimax(&child, depth + 1, false, alpha, beta));
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INF;
            for pos in Position::empty_cells(board) {
                let child = board.with(pos, self.opponent);
                best = best.min(self.minimax(&child, depth + 1, true, alpha, beta));
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: [&str; 3]) -> Board {
        let mut board = Board::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if let (Some(player), Some(pos)) = (Player::from_symbol(ch), Position::new(r, c)) {
                    board = board.with(pos, player);
                }
            }
        }
        board
    }

    fn search(board: &Board, ai: Player) -> ScoredMove {
        Searcher::new(ai, ai.opponent())
            .search(board)
            .best
            .expect("board has empty squares")
    }

    #[test]
    fn test_takes_immediate_win() {
        let board = board_from(["OO.", "XX.", "X.."]);
        let best = search(&board, Player::O);
        assert_eq!(best.position, Position::new(0, 2).unwrap());
        assert_eq!(best.score, WIN_SCORE);
    }

    #[test]
    fn test_blocks_opponent_line() {
        let board = board_from(["XX.", ".O.", "..."]);
        let best = search(&board, Player::O);
        assert_eq!(best.position, Position::new(0, 2).unwrap());
    }

    #[test]
    fn test_prefers_faster_win() {
        // O can win now at (2,2) or set up slower wins elsewhere.
        let board = board_from(["O.X", "XO.", "X.."]);
        let best = search(&board, Player::O);
        assert_eq!(best.position, Position::new(2, 2).unwrap());
        assert_eq!(best.score, WIN_SCORE);
    }

    #[test]
    fn test_empty_board_is_a_draw_and_first_cell_wins_ties() {
        let result = Searcher::new(Player::X, Player::O).search(&Board::new());
        let best = result.best.unwrap();
        assert_eq!(best.score, 0);
        assert_eq!(best.position, Position::new(0, 0).unwrap());
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = board_from(["XOX", "OXX", "OXO"]);
        let result = Searcher::new(Player::O, Player::X).search(&board);
        assert_eq!(result.best, None);
    }

    #[test]
    fn test_search_is_deterministic() {
        let board = board_from(["X..", "...", "..."]);
        assert_eq!(search(&board, Player::O), search(&board, Player::O));
    }
}
