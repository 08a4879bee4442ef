//! Board management.
//!
//! The board is owned by the round engine; this module only computes new
//! boards from old ones. Duplicate-id repair lives here and nowhere else.

pub mod manager;

pub use manager::{initialize_board, refresh_board, Board, BOARD_SIZE};
