//! Turning a position and a candidate move into a fixed-shape input for scoring.
//!
//! Positions are first brought into a canonical orientation so that the scoring
//! function sees every symmetric variant of a position the same way: the move
//! always lands in the upper triangle of the upper-left quadrant.

use ndarray::Array3;
use tempo_othello::bitboard::Bitboard;
use tempo_othello::parity::HISTOGRAM_BUCKETS;
use tempo_othello::{bits, Board, Game, Location, ParityState, EDGE_LENGTH, NUM_SPACES};

/// Number of 8x8 planes in a [`FeatureBuffer`].
pub const NUM_PLANES: usize = 10 + HISTOGRAM_BUCKETS;

/// Number of values in a flattened [`FeatureBuffer`].
pub const FEATURE_LEN: usize = NUM_PLANES * NUM_SPACES;

/// Cells strictly above the main diagonal.
const UPPER_TRIANGLE: u64 = 0x7F3F_1F0F_0703_0100;

/// Symmetry region of each cell. Regions 0..8 select an orientation directly
/// (`region & 3` the flip, `region >= 4` the transpose); the even regions
/// 8..16 lie on a diagonal and select only the flip.
#[rustfmt::skip]
const REGIONS: [u8; NUM_SPACES] = [
     8,  0,  0,  0,  1,  1,  1, 10,
     4,  8,  0,  0,  1,  1, 10,  5,
     4,  4,  8,  0,  1, 10,  5,  5,
     4,  4,  4,  8, 10,  5,  5,  5,
     6,  6,  6, 12, 14,  7,  7,  7,
     6,  6, 12,  2,  3, 14,  7,  7,
     6, 12,  2,  2,  3,  3, 14,  7,
    12,  2,  2,  2,  3,  3,  3, 14,
];

/// A mirror or rotation that keeps the board's axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flip {
    Identity,
    LeftRight,
    UpDown,
    Rotate180,
}

const FLIPS: [Flip; 4] = [Flip::Identity, Flip::LeftRight, Flip::UpDown, Flip::Rotate180];

impl Flip {
    #[inline]
    pub fn apply(self, bitboard: Bitboard) -> Bitboard {
        match self {
            Flip::Identity => bitboard,
            Flip::LeftRight => bitboard.flip_left_right(),
            Flip::UpDown => bitboard.flip_up_down(),
            Flip::Rotate180 => bitboard.flip_180(),
        }
    }
}

/// One of the eight symmetries of the board: a flip, then optionally a transpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Orientation {
    pub flip: Flip,
    pub transpose: bool,
}

impl Orientation {
    pub const IDENTITY: Self = Self {
        flip: Flip::Identity,
        transpose: false,
    };

    /// Every symmetry of the board.
    pub const ALL: [Self; 8] = [
        Self { flip: Flip::Identity, transpose: false },
        Self { flip: Flip::LeftRight, transpose: false },
        Self { flip: Flip::UpDown, transpose: false },
        Self { flip: Flip::Rotate180, transpose: false },
        Self { flip: Flip::Identity, transpose: true },
        Self { flip: Flip::LeftRight, transpose: true },
        Self { flip: Flip::UpDown, transpose: true },
        Self { flip: Flip::Rotate180, transpose: true },
    ];

    /// Transform a bitboard.
    #[inline]
    pub fn apply(self, bitboard: Bitboard) -> Bitboard {
        let flipped = self.flip.apply(bitboard);
        if self.transpose {
            flipped.transpose()
        } else {
            flipped
        }
    }

    /// Transform a location.
    #[inline]
    pub fn apply_location(self, loc: Location) -> Location {
        Location::from_onehot_unchecked(self.apply(loc.bitboard()))
    }

    /// Transform both sides of a board.
    pub fn apply_board(self, board: Board) -> Board {
        Board {
            active_bitboard: self.apply(board.active_bitboard),
            opponent_bitboard: self.apply(board.opponent_bitboard),
            just_passed: board.just_passed,
        }
    }

    /// The orientation undoing this one.
    pub fn inverse(self) -> Self {
        if !self.transpose {
            return self;
        }

        // Transposing swaps the roles of the two mirrors.
        let flip = match self.flip {
            Flip::LeftRight => Flip::UpDown,
            Flip::UpDown => Flip::LeftRight,
            other => other,
        };
        Self {
            flip,
            transpose: true,
        }
    }

    /// The orientation that brings `mv` into the canonical triangle.
    ///
    /// For moves on a diagonal two orientations qualify, and the board decides:
    /// at the first cell above the diagonal where the board differs from its
    /// transpose, the untransposed board should hold the mover's stone, or an
    /// opponent stone facing an empty cell. Boards equal to their transpose
    /// are left untransposed.
    pub fn canonical(board: Board, mv: Location) -> Self {
        let region = REGIONS[mv.to_index() as usize];
        if region < 8 {
            return Self {
                flip: FLIPS[(region & 3) as usize],
                transpose: region >= 4,
            };
        }

        let flip = FLIPS[((region - 8) / 2) as usize];
        let active = flip.apply(board.active_bitboard);
        let opponent = flip.apply(board.opponent_bitboard);

        Self {
            flip,
            transpose: !keeps_orientation(active, opponent),
        }
    }
}

fn keeps_orientation(active: Bitboard, opponent: Bitboard) -> bool {
    let active_t = active.transpose();
    let opponent_t = opponent.transpose();

    let diff = u64::from((active ^ active_t) | (opponent ^ opponent_t)) & UPPER_TRIANGLE;
    if diff == 0 {
        return true;
    }

    let first = Bitboard::from(bits::coord_at(bits::count_leading_zeros(diff) as u8));
    active.intersects(first) || (opponent.intersects(first) && !active_t.intersects(first))
}

/// Sixteen binary 8x8 planes describing a position and a candidate move.
///
/// | plane  | contents                                           |
/// |--------|----------------------------------------------------|
/// | 0      | mover's stones before the move                     |
/// | 1      | opponent's stones before the move                  |
/// | 2      | empty cells before the move                        |
/// | 3      | the move                                           |
/// | 4      | the move and every stone it flips                  |
/// | 5, 6   | odd and even empty regions                         |
/// | 7      | filled once a stone has reached the outer ring     |
/// | 8      | filled if the number of empty cells is odd         |
/// | 9      | filled if there is one odd region or an even count |
/// | 10..16 | cells changed 1, 2, .., 6+ times                   |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeatureBuffer {
    planes: [Bitboard; NUM_PLANES],
}

impl FeatureBuffer {
    #[inline]
    pub fn plane(&self, index: usize) -> Bitboard {
        self.planes[index]
    }

    /// Whether a cell is set, by plane, row and column.
    #[inline]
    pub fn get(&self, plane: usize, row: usize, col: usize) -> bool {
        let index = (row * EDGE_LENGTH + col) as u8;
        self.planes[plane].intersects(Bitboard::from(bits::coord_at(index)))
    }

    /// The planes as a `[16, 8, 8]` array of zeros and ones.
    pub fn to_array(&self) -> Array3<f32> {
        Array3::from_shape_fn((NUM_PLANES, EDGE_LENGTH, EDGE_LENGTH), |(plane, row, col)| {
            if self.get(plane, row, col) {
                1.0
            } else {
                0.0
            }
        })
    }

    /// The planes as a flat vector of [`FEATURE_LEN`] zeros and ones,
    /// indexed by `plane * 64 + row * 8 + col`.
    pub fn to_vec(&self) -> Vec<f32> {
        self.planes
            .iter()
            .flat_map(|plane| plane.unpack().to_vec())
            .map(|set| if set { 1.0 } else { 0.0 })
            .collect()
    }
}

#[inline]
fn fill(condition: bool) -> Bitboard {
    if condition {
        Bitboard::FULL
    } else {
        Bitboard::EMPTY
    }
}

/// Encode the active player's move at `mv`, which flips `flips`.
///
/// `parity` must describe `board` before the move. The result is expressed in
/// the canonical orientation for `mv`.
///
/// # Panics
/// If `mv` is not a legal move on `board`, or `flips` are not the stones it flips.
pub fn encode(board: Board, mv: Location, flips: Bitboard, parity: &ParityState) -> FeatureBuffer {
    assert!(
        !board.occupied_mask().intersects(mv.bitboard()),
        "cannot encode {}: the cell is occupied",
        mv
    );
    assert!(
        !flips.is_empty() && flips == board.flips(mv),
        "cannot encode {}: it does not flip {:#018x}",
        mv,
        u64::from(flips)
    );

    let orientation = Orientation::canonical(board, mv);
    let empties = board.empty_mask();

    let mut planes = [Bitboard::EMPTY; NUM_PLANES];
    planes[0] = board.active_bitboard;
    planes[1] = board.opponent_bitboard;
    planes[2] = empties;
    planes[3] = mv.bitboard();
    planes[4] = mv.bitboard() | flips;
    planes[5] = parity.odd_area;
    planes[6] = parity.even_area;
    planes[7] = fill(!parity.early_turn);
    planes[8] = fill(empties.count_occupied() % 2 == 1);
    planes[9] = fill(parity.odd_count == 1 || parity.odd_count % 2 == 0);
    planes[10..].copy_from_slice(&parity.flip_histogram);

    for plane in planes.iter_mut() {
        *plane = orientation.apply(*plane);
    }

    FeatureBuffer { planes }
}

/// Encode a legal move of a [`Game`] for its active player.
pub fn encode_move(game: &Game, mv: Location) -> FeatureBuffer {
    encode(game.board, mv, game.board.flips(mv), &game.parity)
}
