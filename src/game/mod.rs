//! Core Connect Four game logic: the board, the two markers, and the session
//! state machine that runs turns between the player and an opponent.

mod board;
mod player;
mod session;

pub use board::{Board, Connection, COLS, MAX_MOVES, ROWS};
pub use player::{Cell, Marker};
pub use session::{Session, SessionState};
