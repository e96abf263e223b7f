//! Core domain types for tic-tac-toe.

use crate::{GameMode, Move, MoveError, Position};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Side in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Board symbol for this side.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }

    /// Parses a board symbol (case-insensitive).
    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Player::X),
            'O' => Some(Player::O),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// The board is `Copy` so search code can branch on snapshots instead of
/// mutating and restoring a shared grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.index()]
    }

    /// Gets the square at raw coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfBounds`] if `row` or `col` is outside 0-2.
    pub fn cell_at(&self, row: usize, col: usize) -> Result<Square, MoveError> {
        Position::new(row, col)
            .map(|pos| self.get(pos))
            .ok_or(MoveError::OutOfBounds { row, col })
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.index()] = square;
    }

    /// Returns a copy of this board with `player` placed at `pos`.
    pub fn with(&self, pos: Position, player: Player) -> Self {
        let mut next = *self;
        next.set(pos, Square::Occupied(player));
        next
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// True iff no square is empty.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Number of squares held by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }

    /// Number of occupied squares.
    pub fn filled(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            result.push(' ');
            for col in 0..3 {
                let symbol = match self.squares[row * 3 + col] {
                    Square::Empty => ' ',
                    Square::Occupied(player) => player.symbol(),
                };
                result.push(symbol);
                if col < 2 {
                    result.push_str(" | ");
                }
            }
            if row < 2 {
                result.push_str("\n---+---+---\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Drawn,
    /// Overwrite game hit its move cap without a result.
    MoveLimit,
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Current player to move.
    current_player: Player,
    /// Game status.
    status: GameStatus,
    /// Accepted moves in order.
    history: Vec<Move>,
}

impl GameState {
    /// Creates a new game.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Clears the board, gives the move to X and reactivates the game.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current player.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True while moves are still accepted.
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of accepted moves, overwrites included.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Places the mover's mark (unchecked - validate first).
    pub(crate) fn apply_move(&mut self, action: Move) {
        self.board.set(action.position, Square::Occupied(action.player));
        self.history.push(action);
    }

    /// Hands the move to the other side.
    pub(crate) fn switch_player(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Sets the game status.
    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    /// Checks the placement invariants that hold for `mode`.
    ///
    /// Classic play keeps the mark counts within one of each other and the
    /// history length equal to the number of filled squares. Overwrite play
    /// can reclaim squares, so neither property holds there.
    #[instrument(skip(self))]
    pub fn is_consistent(&self, mode: GameMode) -> bool {
        if mode.allows_overwrite() {
            return true;
        }
        let x_count = self.board.count(Player::X);
        let o_count = self.board.count(Player::O);
        let balanced = x_count.abs_diff(o_count) <= 1;
        let complete = self.board.filled() == self.history.len();
        if !balanced || !complete {
            warn!(x_count, o_count, history = self.history.len(), "Board consistency violated");
        }
        balanced && complete
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_out_of_range() {
        let board = Board::new();
        assert_eq!(
            board.cell_at(3, 0),
            Err(MoveError::OutOfBounds { row: 3, col: 0 })
        );
        assert_eq!(board.cell_at(1, 1), Ok(Square::Empty));
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let board = Board::new();
        let center = Position::new(1, 1).unwrap();
        let next = board.with(center, Player::X);
        assert!(board.is_empty(center));
        assert_eq!(next.get(center), Square::Occupied(Player::X));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = GameState::new();
        state.apply_move(Move::new(Player::X, Position::new(0, 0).unwrap()));
        state.switch_player();
        state.set_status(GameStatus::Won(Player::X));

        state.reset();
        assert_eq!(state, GameState::new());
        assert_eq!(state.current_player(), Player::X);
        assert!(state.is_active());
    }

    #[test]
    fn test_display_layout() {
        let board = Board::new().with(Position::new(0, 0).unwrap(), Player::X);
        assert_eq!(board.display().lines().next(), Some(" X |   |  "));
    }
}
