//! `tempo-othello` is the board engine behind the tempo player.
//!
//!  - [`bits`] has the word-level primitives: cell indexing, transposes and mirrors.
//!  - [`bitboard`] generates moves and flips with whole-board bit operations, without
//!    checking that its inputs describe a reachable position.
//!  - [`Board`] is a position from the mover's point of view, fast enough for search.
//!  - [`Game`] tracks colours, turn count and the [`parity`] regions of the empty
//!    cells, and refuses illegal moves.

pub mod bitboard;
pub mod bits;
pub mod parity;
pub mod test_utils;

mod board;
mod game;
mod location;
mod utils;

pub use board::*;
pub use game::*;
pub use location::*;
pub use parity::ParityState;

/// The number of spaces on one edge of an Othello board.
pub const EDGE_LENGTH: usize = 8;

/// The number of spaces on an Othello board.
pub const NUM_SPACES: usize = 64;
