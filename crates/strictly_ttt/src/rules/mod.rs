//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating a grid and for
//! assigning signs between rounds. Rules are separated from board storage
//! so the move selector and the invariants can share them.

pub mod draw;
pub mod sign;
pub mod win;

pub use draw::{empty_cells, is_full};
pub use sign::next_player_sign;
pub use win::{WIN_LINES, WinLine, completed_line};
