//! Pure tic-tac-toe board model.
//!
//! Board storage, the seat-to-mark mapping and win-line detection live here,
//! free of any I/O, so both the sync engine and its tests can reason about
//! boards without a server.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod lines;
mod types;

pub use lines::{Line, detect_win_line, winning_cells};
pub use types::{ActorIndex, Board, Cell, Coord, Mark, Outcome};
