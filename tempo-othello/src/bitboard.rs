//! Low-level bitboard operations.
//!
//! For efficiency, [`Bitboard`] operations are unchecked and may cause undefined
//! behavior if invalid data is passed.
//!
//! Under the hood, all these operations work on u64 bitboards. By convention,
//! the MSB is the upper-left of the board, and uses row-major order.

use crate::{bits, utils, NUM_SPACES};
use derive_more::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, From, Into, Not,
};
use std::fmt::{self, Display, Formatter};

/// Holds a single bit per location on an Othello board.
/// Wraps [`u64`] for efficient bit-twiddling, but avoids mixing with numerics.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    Default,
    From,
    Into,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct Bitboard(u64);

/// Starting bitboard for Black.
pub const BLACK_START: Bitboard = Bitboard(0x0000_0008_1000_0000);

/// Starting bitboard for White.
pub const WHITE_START: Bitboard = Bitboard(0x0000_0010_0800_0000);

/// Every cell on the outer ring of the board.
pub const RING: Bitboard = Bitboard(0xff81_8181_8181_81ff);

/// Everything except the far-left and far-right columns.
const INNER_COLUMNS: u64 = 0x7E7E_7E7E_7E7E_7E7E;

impl Display for Bitboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        utils::format_grid(
            self.into_iter().map(|bit| match bit {
                false => '.',
                true => '#',
            }),
            f,
        )
    }
}

impl Bitboard {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(u64::MAX);

    /// Wrap a raw mask. Usable in constant expressions, unlike [`From`].
    #[inline]
    pub const fn from_raw(bits: u64) -> Self {
        Self(bits)
    }

    /// Count the number of occupied spaces in the bitboard.
    #[inline]
    pub fn count_occupied(self) -> u8 {
        bits::popcount(self.0) as u8
    }

    /// Count the number of empty spaces in the bitboard.
    #[inline]
    pub fn count_empty(self) -> u8 {
        NUM_SPACES as u8 - self.count_occupied()
    }

    /// Return true if this bitboard is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return true if this bitboard shares any location with `other`.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Mirror across the main diagonal.
    #[inline]
    pub fn transpose(self) -> Self {
        Self(bits::transpose(self.0))
    }

    /// Mirror left to right.
    #[inline]
    pub fn flip_left_right(self) -> Self {
        Self(bits::flip_left_right(self.0))
    }

    /// Mirror top to bottom.
    #[inline]
    pub fn flip_up_down(self) -> Self {
        Self(bits::flip_up_down(self.0))
    }

    /// Rotate by 180 degrees.
    #[inline]
    pub fn flip_180(self) -> Self {
        Self(bits::flip_180(self.0))
    }

    /// Split the bits in this bitboard into an array, in row-major order.
    #[inline]
    pub fn unpack(self) -> [bool; NUM_SPACES] {
        let mut cells = [false; NUM_SPACES];
        for (index, cell) in cells.iter_mut().enumerate() {
            *cell = self.0 & bits::coord_at(index as u8) != 0;
        }
        cells
    }
}

/// Score a board as: # my pieces - # opponent pieces.
/// Faster than [`score_winner_gets_empties()`], but less common.
/// Undefined behavior if both players have a piece at the same location.
#[inline]
pub fn score_absolute_difference(active: Bitboard, opponent: Bitboard) -> i8 {
    (active.count_occupied() as i8) - (opponent.count_occupied() as i8)
}

/// Score a board as: # my spaces - # opponent spaces, where empty spaces are scored for the winner.
/// Undefined behavior if both players have a piece at the same location.
#[inline]
pub fn score_winner_gets_empties(active: Bitboard, opponent: Bitboard) -> i8 {
    let absolute_difference = score_absolute_difference(active, opponent);
    let empties = (active | opponent).count_empty() as i8;

    if absolute_difference.is_positive() {
        absolute_difference + empties
    } else if absolute_difference.is_negative() {
        absolute_difference - empties
    } else {
        0
    }
}

/// Occluded fill of `generator` through `propagator`, shifting toward the MSB.
#[inline]
fn fill_left(mut generator: u64, mut propagator: u64, shift: u32) -> u64 {
    generator |= propagator & (generator << shift);
    propagator &= propagator << shift;
    generator |= propagator & (generator << (2 * shift));
    propagator &= propagator << (2 * shift);
    generator | (propagator & (generator << (4 * shift)))
}

/// Occluded fill of `generator` through `propagator`, shifting toward the LSB.
#[inline]
fn fill_right(mut generator: u64, mut propagator: u64, shift: u32) -> u64 {
    generator |= propagator & (generator >> shift);
    propagator &= propagator >> shift;
    generator |= propagator & (generator >> (2 * shift));
    propagator &= propagator >> (2 * shift);
    generator | (propagator & (generator >> (4 * shift)))
}

/// Compute a mask of the legal moves for the active player from
/// masks of the active player's pieces and the opponent's pieces.
/// Undefined behavior if an invalid Othello board is specified.
// Parallel-prefix ("kogge-stone") sliding fills, one per ray direction.
#[inline]
pub fn get_move_mask(active: Bitboard, opponent: Bitboard) -> Bitboard {
    let opponent_inner = opponent.0 & INNER_COLUMNS;

    // Shift and wraparound-clipped opponent mask for each axis: E/W, N/S, NE/SW, NW/SE.
    // Each axis is walked once toward the MSB and once toward the LSB.
    let axes = [
        (1, opponent_inner),
        (8, opponent.0),
        (7, opponent_inner),
        (9, opponent_inner),
    ];

    let mut captures = 0;
    for &(shift, propagator) in axes.iter() {
        let smear_left = fill_left(active.0, propagator, shift);
        let smear_right = fill_right(active.0, propagator, shift);

        // One extra step past the run of opponent pieces lands on the candidate move.
        captures |= (smear_left & propagator) << shift;
        captures |= (smear_right & propagator) >> shift;
    }

    let empties = !(active.0 | opponent.0);
    Bitboard(empties & captures)
}

/// Compute the opponent pieces flipped when the active player moves at `index`.
/// `index` must be an empty location in 0..64, with cell 0 the upper-left.
/// The result is empty if the move is not legal.
// Outflank idiom from Toshihiko Okuhara's flip routines:
// http://www.amy.hi-ho.ne.jp/okuhara/flipcuda.htm
#[inline]
pub fn compute_flips(active: Bitboard, opponent: Bitboard, index: u8) -> Bitboard {
    const TOP_LEFT: u64 = 1 << 63;

    let player = active.0;
    let opponent_inner = opponent.0 & INNER_COLUMNS;

    // Rays toward higher cell indices (lower bits): S, E, SW, SE.
    // The nearest cell along the ray is the most significant bit of the mask,
    // so the first non-opponent cell is found with a leading-zero count.
    let forward_rays = [
        (0x0080_8080_8080_8080u64, opponent.0),
        (0x7f00_0000_0000_0000, opponent_inner),
        (0x0102_0408_1020_4000, opponent_inner),
        (0x0040_2010_0804_0201, opponent_inner),
    ];

    let mut flipped = 0;
    for &(ray, propagator) in forward_rays.iter() {
        let mask = ray >> index;
        let first_gap = bits::count_leading_zeros(!propagator & mask);
        let outflank = TOP_LEFT.checked_shr(first_gap).unwrap_or(0) & player;
        flipped |= outflank.wrapping_neg().wrapping_mul(2) & mask;
    }

    // Rays toward lower cell indices (higher bits): N, W, NE, NW.
    // Carrying +1 through the opponent run lands on the outflanking cell.
    let reverse_rays = [
        (0x0101_0101_0101_0100u64, opponent.0),
        (0x0000_0000_0000_00fe, opponent_inner),
        (0x0002_0408_1020_4080, opponent_inner),
        (0x8040_2010_0804_0200, opponent_inner),
    ];

    for &(ray, propagator) in reverse_rays.iter() {
        let mask = ray << (63 - index);
        let outflank = mask & (propagator | !mask).wrapping_add(1) & player;
        flipped |= outflank.wrapping_sub((outflank != 0) as u64) & mask;
    }

    Bitboard(flipped)
}

/// Compute an updated board after a given move is made, returning new bitboards
/// for the active player and the opponent. `move_mask` must be a one-hot bitboard
/// indicating the move location, and `flips` the result of [`compute_flips()`] for it.
#[inline]
pub fn apply_flips(
    active: Bitboard,
    opponent: Bitboard,
    move_mask: Bitboard,
    flips: Bitboard,
) -> (Bitboard, Bitboard) {
    (active ^ flips ^ move_mask, opponent ^ flips)
}

/// Compute an updated board after a given move is made.
/// Undefined behavior if an invalid Othello board or `move_mask` is provided.
#[inline]
pub fn apply_move(
    active: Bitboard,
    opponent: Bitboard,
    move_mask: Bitboard,
) -> (Bitboard, Bitboard) {
    let flips = compute_flips(active, opponent, bits::index_of(move_mask.0));
    apply_flips(active, opponent, move_mask, flips)
}

/// Iterator for the bits in a [`Bitboard`].
#[derive(Clone, Copy, Debug)]
pub struct Bits {
    next_index: usize,
    bitboard: Bitboard,
}

impl Iterator for Bits {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index == NUM_SPACES {
            return None;
        }

        let bit = self.bitboard.0 & bits::coord_at(self.next_index as u8) != 0;
        self.next_index += 1;

        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = NUM_SPACES - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits {}

/// Iterate over the bits in row-major order.
impl IntoIterator for Bitboard {
    type Item = bool;
    type IntoIter = Bits;

    fn into_iter(self) -> Self::IntoIter {
        Bits {
            next_index: 0,
            bitboard: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(indices: &[u8]) -> Bitboard {
        indices
            .iter()
            .fold(Bitboard::EMPTY, |bb, &i| bb | Bitboard(bits::coord_at(i)))
    }

    #[test]
    fn opening_moves() {
        let moves = get_move_mask(BLACK_START, WHITE_START);
        assert_eq!(moves, cells(&[19, 26, 37, 44]));
    }

    #[test]
    fn opening_flips() {
        // Black at d3 (19) flips the white stone at d4 (27).
        assert_eq!(compute_flips(BLACK_START, WHITE_START, 19), cells(&[27]));
        assert_eq!(compute_flips(BLACK_START, WHITE_START, 37), cells(&[36]));
        // Not a legal move: nothing flips.
        assert_eq!(compute_flips(BLACK_START, WHITE_START, 0), Bitboard::EMPTY);
    }

    #[test]
    fn flips_do_not_wrap_rows() {
        // Opponent on h1 (7), player on a2 (8): moving at g1 (6) must not flip through the edge.
        let active = cells(&[8]);
        let opponent = cells(&[7]);
        assert_eq!(compute_flips(active, opponent, 6), Bitboard::EMPTY);
        assert!(!get_move_mask(active, opponent).intersects(cells(&[6])));
    }

    #[test]
    fn long_diagonal_flip() {
        // Player on h8 (63), opponents b2..g7, move at a1 (0).
        let active = cells(&[63]);
        let opponent = cells(&[9, 18, 27, 36, 45, 54]);
        assert_eq!(compute_flips(active, opponent, 0), opponent);
        assert!(get_move_mask(active, opponent).intersects(cells(&[0])));
    }

    #[test]
    fn apply_opening_move() {
        let (black, white) = apply_move(BLACK_START, WHITE_START, cells(&[19]));
        assert_eq!(black, cells(&[19, 27, 28, 35]));
        assert_eq!(white, cells(&[36]));
    }

    #[test]
    fn winner_gets_empties() {
        assert_eq!(score_winner_gets_empties(BLACK_START, WHITE_START), 0);
        let (black, white) = apply_move(BLACK_START, WHITE_START, cells(&[19]));
        assert_eq!(score_absolute_difference(black, white), 3);
        assert_eq!(score_winner_gets_empties(black, white), 3 + 59);
    }

    #[test]
    fn iterates_row_major() {
        let bits: Vec<bool> = cells(&[0, 63]).into_iter().collect();
        assert_eq!(bits.len(), NUM_SPACES);
        assert!(bits[0] && bits[63]);
        assert_eq!(bits.iter().filter(|&&b| b).count(), 2);
        assert_eq!(cells(&[5]).unpack()[5], true);
    }
}
