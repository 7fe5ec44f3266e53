//! Branchless bit-twiddling primitives on raw `u64` boards.
//!
//! All functions are total and constant-time. Cells are indexed 0..64 in
//! row-major order starting at the upper-left, which is the MSB of the word.

/// The upper-left cell (index 0).
const TOP_LEFT: u64 = 1 << 63;

/// De Bruijn-style multiplier: every one-hot word hashes to a distinct 6-bit key.
const HASH_MULTIPLIER: u64 = 0x03F5_66ED_2717_9461;

/// Maps a hashed one-hot word back to its cell index.
const INDEX_TABLE: [u8; 64] = build_index_table();

const fn build_index_table() -> [u8; 64] {
    let mut table = [0u8; 64];
    let mut index = 0;
    while index < 64 {
        let onehot = TOP_LEFT >> index;
        table[hash(onehot)] = index as u8;
        index += 1;
    }
    table
}

#[inline]
const fn hash(onehot: u64) -> usize {
    (onehot.wrapping_mul(HASH_MULTIPLIER) >> 58) as usize
}

/// Count the set bits with a SWAR reduction.
#[inline]
pub const fn popcount(mut bits: u64) -> u32 {
    bits = (bits & 0x5555_5555_5555_5555) + ((bits >> 1) & 0x5555_5555_5555_5555);
    bits = (bits & 0x3333_3333_3333_3333) + ((bits >> 2) & 0x3333_3333_3333_3333);
    bits = (bits & 0x0f0f_0f0f_0f0f_0f0f) + ((bits >> 4) & 0x0f0f_0f0f_0f0f_0f0f);
    bits = (bits & 0x00ff_00ff_00ff_00ff) + ((bits >> 8) & 0x00ff_00ff_00ff_00ff);
    bits = (bits & 0x0000_ffff_0000_ffff) + ((bits >> 16) & 0x0000_ffff_0000_ffff);
    bits = (bits & 0x0000_0000_ffff_ffff) + ((bits >> 32) & 0x0000_0000_ffff_ffff);
    bits as u32
}

/// Count the zeros above the highest set bit (64 for an empty word).
#[inline]
pub const fn count_leading_zeros(mut bits: u64) -> u32 {
    // Smear the highest bit downward, then count what is left unset.
    bits |= bits >> 1;
    bits |= bits >> 2;
    bits |= bits >> 4;
    bits |= bits >> 8;
    bits |= bits >> 16;
    bits |= bits >> 32;
    popcount(!bits)
}

/// Count the zeros below the lowest set bit (64 for an empty word).
#[inline]
pub const fn count_trailing_zeros(bits: u64) -> u32 {
    // One less than the lowest bit is a run of exactly that many ones.
    popcount(rightmost_bit(bits).wrapping_sub(1))
}

/// Isolate the lowest set bit.
#[inline]
pub const fn rightmost_bit(bits: u64) -> u64 {
    bits & bits.wrapping_neg()
}

/// Cell index of a one-hot word. Meaningless for words with zero or several bits set.
#[inline]
pub const fn index_of(onehot: u64) -> u8 {
    INDEX_TABLE[hash(onehot)]
}

/// One-hot word for a cell index in 0..64.
#[inline]
pub const fn coord_at(index: u8) -> u64 {
    TOP_LEFT >> index
}

/// One-hot word for column `x` and row `y`, both in 0..8.
#[inline]
pub const fn coord_at_xy(x: u8, y: u8) -> u64 {
    coord_at(y * 8 + x)
}

/// Mirror the board across the main (upper-left to lower-right) diagonal.
#[inline]
pub const fn transpose(matrix: u64) -> u64 {
    matrix & 0x8040_2010_0804_0201
        | (matrix & 0x0080_4020_1008_0402) << 7
        | (matrix & 0x0000_8040_2010_0804) << 14
        | (matrix & 0x0000_0080_4020_1008) << 21
        | (matrix & 0x0000_0000_8040_2010) << 28
        | (matrix & 0x0000_0000_0080_4020) << 35
        | (matrix & 0x0000_0000_0000_8040) << 42
        | (matrix & 0x0000_0000_0000_0080) << 49
        | (matrix >> 7) & 0x0080_4020_1008_0402
        | (matrix >> 14) & 0x0000_8040_2010_0804
        | (matrix >> 21) & 0x0000_0080_4020_1008
        | (matrix >> 28) & 0x0000_0000_8040_2010
        | (matrix >> 35) & 0x0000_0000_0080_4020
        | (matrix >> 42) & 0x0000_0000_0000_8040
        | (matrix >> 49) & 0x0000_0000_0000_0080
}

/// Mirror the board left to right.
#[inline]
pub const fn flip_left_right(mut matrix: u64) -> u64 {
    matrix = (matrix >> 4) & 0x0f0f_0f0f_0f0f_0f0f | (matrix & 0x0f0f_0f0f_0f0f_0f0f) << 4;
    matrix = (matrix >> 2) & 0x3333_3333_3333_3333 | (matrix & 0x3333_3333_3333_3333) << 2;
    (matrix >> 1) & 0x5555_5555_5555_5555 | (matrix & 0x5555_5555_5555_5555) << 1
}

/// Mirror the board top to bottom.
#[inline]
pub const fn flip_up_down(mut matrix: u64) -> u64 {
    matrix = matrix >> 32 | matrix << 32;
    matrix = (matrix >> 16) & 0x0000_ffff_0000_ffff | (matrix & 0x0000_ffff_0000_ffff) << 16;
    (matrix >> 8) & 0x00ff_00ff_00ff_00ff | (matrix & 0x00ff_00ff_00ff_00ff) << 8
}

/// Rotate the board by 180 degrees, which reverses the bit order.
#[inline]
pub const fn flip_180(matrix: u64) -> u64 {
    flip_left_right(flip_up_down(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [u64; 8] = [
        0,
        1,
        1 << 63,
        0xffff_ffff_ffff_ffff,
        0x0000_0008_1000_0000,
        0x8040_2010_0804_0201,
        0xdead_beef_0bad_f00d,
        0x0123_4567_89ab_cdef,
    ];

    #[test]
    fn popcount_matches_intrinsic() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(0x0000_0001_0000_0000), 1);
        assert_eq!(popcount(0xf000_0000_0000_000f), 8);
        for &sample in SAMPLES.iter() {
            assert_eq!(popcount(sample), sample.count_ones());
        }
    }

    #[test]
    fn zero_counts_match_intrinsics() {
        for &sample in SAMPLES.iter() {
            assert_eq!(count_leading_zeros(sample), sample.leading_zeros());
            assert_eq!(count_trailing_zeros(sample), sample.trailing_zeros());
        }
    }

    #[test]
    fn rightmost_bit_isolates_lowest() {
        assert_eq!(rightmost_bit(0b1011_0000), 0b1_0000);
        assert_eq!(rightmost_bit(0), 0);
        assert_eq!(rightmost_bit(1 << 63), 1 << 63);
    }

    #[test]
    fn index_of_is_msb_first() {
        assert_eq!(index_of(0x8000_0000_0000_0000), 0);
        assert_eq!(index_of(0x4000_0000_0000_0000), 1);
        assert_eq!(index_of(0x0000_0000_0000_0001), 63);
    }

    #[test]
    fn coord_index_round_trip() {
        for index in 0..64u8 {
            let coord = coord_at(index);
            assert_eq!(coord.count_ones(), 1);
            assert_eq!(index_of(coord), index);
            assert_eq!(coord_at(index_of(coord)), coord);
        }
        assert_eq!(coord_at_xy(0, 0), 1 << 63);
        assert_eq!(coord_at_xy(7, 7), 1);
        assert_eq!(coord_at_xy(3, 2), coord_at(19));
    }

    #[test]
    fn transforms_are_involutions() {
        for &sample in SAMPLES.iter() {
            assert_eq!(transpose(transpose(sample)), sample);
            assert_eq!(flip_left_right(flip_left_right(sample)), sample);
            assert_eq!(flip_up_down(flip_up_down(sample)), sample);
            assert_eq!(flip_180(flip_180(sample)), sample);
            assert_eq!(flip_180(sample), sample.reverse_bits());
        }
    }

    #[test]
    fn transforms_move_cells() {
        // (x, y) = (3, 1)
        let cell = coord_at_xy(3, 1);
        assert_eq!(transpose(cell), coord_at_xy(1, 3));
        assert_eq!(flip_left_right(cell), coord_at_xy(4, 1));
        assert_eq!(flip_up_down(cell), coord_at_xy(3, 6));
        assert_eq!(flip_180(cell), coord_at_xy(4, 6));
    }
}
