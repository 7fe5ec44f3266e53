//! Cells of the board, and sets of them that iterate one cell at a time.

use crate::bitboard::Bitboard;
use crate::{bits, EDGE_LENGTH, NUM_SPACES};
use derive_more::{Display, Error, From, Into};
use std::fmt;

const COLUMNS: &[u8; EDGE_LENGTH] = b"ABCDEFGH";

/// A single cell, stored as a one-hot [`Bitboard`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Into)]
pub struct Location(Bitboard);

/// A set of cells, usually the legal moves of a position.
/// Iterating yields the highest-indexed cell first.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, From, Into)]
pub struct LocationList(Bitboard);

impl Location {
    /// Panics unless exactly one cell is set.
    #[inline]
    pub fn from_onehot(bitboard: Bitboard) -> Self {
        assert_eq!(bitboard.count_occupied(), 1, "not a single cell");
        Self(bitboard)
    }

    /// Wrap `bitboard` as-is. Only sound if exactly one cell is set.
    #[inline]
    pub fn from_onehot_unchecked(bitboard: Bitboard) -> Self {
        Self(bitboard)
    }

    /// Cell index, row-major from 0 at A1 to 63 at H8.
    #[inline]
    pub fn from_index(index: u8) -> Self {
        assert!((index as usize) < NUM_SPACES, "cell index {} out of range", index);
        Self(Bitboard::from(bits::coord_at(index)))
    }

    #[inline]
    pub fn to_index(self) -> u8 {
        bits::index_of(self.0.into())
    }

    pub fn from_coords(row: usize, col: usize) -> Self {
        assert!(row < EDGE_LENGTH && col < EDGE_LENGTH, "({}, {}) is off the board", row, col);
        Self(Bitboard::from(bits::coord_at_xy(col as u8, row as u8)))
    }

    /// `(row, column)`, both from 0.
    pub fn to_coords(self) -> (usize, usize) {
        let index = self.to_index() as usize;
        (index / EDGE_LENGTH, index % EDGE_LENGTH)
    }

    #[inline]
    pub fn bitboard(self) -> Bitboard {
        self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.to_coords();
        write!(f, "{}{}", COLUMNS[col] as char, row + 1)
    }
}

#[derive(Debug, Display, Error, PartialEq)]
#[display(fmt = "expected a column A-H followed by a row 1-8")]
pub struct ParseLocationError;

/// Parses "F5"-style notation, ignoring the column's case.
impl std::str::FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[col, row @ b'1'..=b'8'] => {
                let col = COLUMNS
                    .iter()
                    .position(|&c| c == col.to_ascii_uppercase())
                    .ok_or(ParseLocationError)?;
                Ok(Self::from_coords((row - b'1') as usize, col))
            }
            _ => Err(ParseLocationError),
        }
    }
}

impl LocationList {
    #[inline]
    pub fn contains(self, loc: Location) -> bool {
        self.0.intersects(loc.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn num_moves(self) -> u8 {
        self.0.count_occupied()
    }

    /// The location iteration would start with.
    #[inline]
    pub fn first(mut self) -> Option<Location> {
        self.next()
    }
}

impl Iterator for LocationList {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        if self.0.is_empty() {
            return None;
        }

        let cell = Bitboard::from(bits::rightmost_bit(self.0.into()));
        self.0 ^= cell;
        Some(Location(cell))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_moves() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LocationList {}

impl fmt::Display for LocationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, loc) in self.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", loc)?;
        }
        f.write_str("]")
    }
}
