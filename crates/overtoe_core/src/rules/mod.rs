//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Rules are separated from
//! board storage so the turn controller, the AI search and replay tooling
//! can share them.

pub mod draw;
pub mod terminal;
pub mod win;

pub use draw::{is_draw, is_full};
pub use terminal::{OVERWRITE_DRAW_FLOOR, OVERWRITE_MOVE_LIMIT, evaluate};
pub use win::{LINES, check_winner, has_win};
