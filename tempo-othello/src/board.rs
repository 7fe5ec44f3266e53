//! A fast, unchecked implementation of Othello board dynamics.
//!
//! [`Board`] always stores pieces from the perspective of the player to move.
//! It is intended for hot loops such as endgame search; [`crate::Game`] wraps it
//! with checked moves, colors and terminal detection.

use crate::bitboard::{self, Bitboard, BLACK_START, WHITE_START};
use crate::{utils, Location, LocationList, NUM_SPACES};
use derive_more::{Display, Error};
use std::fmt;

/// A pair of bitboards plus whether the previous action was a pass.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Board {
    pub active_bitboard: Bitboard,
    pub opponent_bitboard: Bitboard,
    pub just_passed: bool,
}

impl Default for Board {
    /// The starting position, from Black's perspective.
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The starting position, from Black's perspective.
    pub const fn new() -> Self {
        Self {
            active_bitboard: BLACK_START,
            opponent_bitboard: WHITE_START,
            just_passed: false,
        }
    }

    /// Build a board from the two players' pieces.
    pub fn from_bitboards(active: Bitboard, opponent: Bitboard) -> Self {
        debug_assert!(!active.intersects(opponent));
        Self {
            active_bitboard: active,
            opponent_bitboard: opponent,
            just_passed: false,
        }
    }

    /// Get the list of legal moves for the active player.
    #[inline]
    pub fn get_moves(self) -> LocationList {
        bitboard::get_move_mask(self.active_bitboard, self.opponent_bitboard).into()
    }

    /// Get the opponent pieces a move at `loc` would flip.
    #[inline]
    pub fn flips(self, loc: Location) -> Bitboard {
        bitboard::compute_flips(self.active_bitboard, self.opponent_bitboard, loc.to_index())
    }

    /// Make a move for the active player and hand the turn over.
    /// Undefined behavior if `loc` is not a legal move.
    #[inline]
    pub fn apply_move(self, loc: Location) -> Self {
        self.apply_flips(loc, self.flips(loc))
    }

    /// Like [`Board::apply_move()`], reusing flips computed by [`Board::flips()`].
    #[inline]
    pub fn apply_flips(self, loc: Location, flips: Bitboard) -> Self {
        let (active, opponent) = bitboard::apply_flips(
            self.active_bitboard,
            self.opponent_bitboard,
            loc.bitboard(),
            flips,
        );

        Self {
            active_bitboard: opponent,
            opponent_bitboard: active,
            just_passed: false,
        }
    }

    /// Pass the turn without moving.
    #[inline]
    pub fn pass(self) -> Self {
        Self {
            active_bitboard: self.opponent_bitboard,
            opponent_bitboard: self.active_bitboard,
            just_passed: true,
        }
    }

    /// Swap which player's pieces are which, keeping the pass flag.
    #[inline]
    pub fn swap_players(self) -> Self {
        Self {
            active_bitboard: self.opponent_bitboard,
            opponent_bitboard: self.active_bitboard,
            just_passed: self.just_passed,
        }
    }

    /// Get a mask indicating where the occupied spaces are.
    #[inline]
    pub fn occupied_mask(self) -> Bitboard {
        self.active_bitboard | self.opponent_bitboard
    }

    /// Get a mask indicating where the empty spaces are.
    #[inline]
    pub fn empty_mask(self) -> Bitboard {
        !self.occupied_mask()
    }

    /// Count the empty spaces left on the board.
    #[inline]
    pub fn count_empties(self) -> u8 {
        self.occupied_mask().count_empty()
    }

    /// Score a board as: # my pieces - # opponent pieces.
    #[inline]
    pub fn score_absolute_difference(self) -> i8 {
        bitboard::score_absolute_difference(self.active_bitboard, self.opponent_bitboard)
    }

    /// Score a board as: # my spaces - # opponent spaces, where empty spaces are scored for the winner.
    #[inline]
    pub fn score_winner_gets_empties(self) -> i8 {
        bitboard::score_winner_gets_empties(self.active_bitboard, self.opponent_bitboard)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active_bitboard.into_iter();
        let opponent = self.opponent_bitboard.into_iter();

        utils::format_grid(
            active.zip(opponent).map(|cell| match cell {
                (true, _) => '#',
                (_, true) => 'O',
                _ => '.',
            }),
            f,
        )
    }
}

#[derive(Debug, Display, Error, PartialEq)]
pub enum ParseBoardError {
    #[display(fmt = "expected {} cells, found {}", NUM_SPACES, _0)]
    WrongLength(#[error(not(source))] usize),
    #[display(fmt = "unrecognized cell character {:?}", _0)]
    BadCell(#[error(not(source))] char),
}

/// Parse a board from 64 row-major characters:
/// `X` for the active player, `O` for the opponent, and `-` or `.` for empty.
impl std::str::FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = utils::grid_cells(s).map_err(ParseBoardError::WrongLength)?;

        let mut active = Bitboard::EMPTY;
        let mut opponent = Bitboard::EMPTY;
        for (index, &cell) in cells.iter().enumerate() {
            let loc = Location::from_index(index as u8).bitboard();
            match cell.to_ascii_uppercase() {
                'X' | '#' => active |= loc,
                'O' => opponent |= loc,
                '-' | '.' => {}
                other => return Err(ParseBoardError::BadCell(other)),
            }
        }

        Ok(Self::from_bitboards(active, opponent))
    }
}
