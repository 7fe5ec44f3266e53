//! Utilities used for testing and benchmarking.

pub mod perft;
pub mod reference;

mod playout;
pub use playout::random_game;
