//! Incremental tracking of odd and even empty regions.
//!
//! A region is a maximal set of empty cells connected through their up, down,
//! left and right neighbors. Regions with an odd number of cells are collected
//! in `odd_area` and the rest in `even_area`. While no stone has touched the
//! outer ring, every empty cell is reachable from every other one around the
//! edge, so the whole empty set is treated as a single region and no fill is
//! needed.
//!
//! A six-bucket histogram records how often each cell has changed hands.

use crate::bitboard::{Bitboard, RING};
use crate::{bits, Board, Location};
use arrayvec::ArrayVec;

/// Empty cells at the start of a game: everything except the center.
const START_EMPTIES: u64 = 0xffff_ffe7_e7ff_ffff;

/// The four center cells, which have each been placed once at the start.
const CENTER: u64 = 0x0000_0018_1800_0000;

/// Clears the leftmost column.
const NOT_LEFT_EDGE: u64 = 0x7f7f_7f7f_7f7f_7f7f;

/// Number of buckets in the change-count histogram. The last bucket saturates.
pub const HISTOGRAM_BUCKETS: usize = 6;

/// Each of the 8 rows holds at most four separate runs, and a fill pushes each
/// run at most once, so 32 pending runs always fit.
const MAX_RUNS: usize = 32;

/// Parity regions of the empty cells, plus the change-count histogram.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ParityState {
    /// Empty cells in regions with an odd number of cells.
    pub odd_area: Bitboard,
    /// Empty cells in regions with an even number of cells.
    pub even_area: Bitboard,
    pub odd_count: u8,
    pub even_count: u8,
    /// True until a stone lands on the outer ring.
    pub early_turn: bool,
    /// Bucket `k` holds the cells that have changed exactly `k + 1` times
    /// (the last bucket: at least that many).
    pub flip_histogram: [Bitboard; HISTOGRAM_BUCKETS],
}

impl Default for ParityState {
    fn default() -> Self {
        Self::new()
    }
}

impl ParityState {
    /// The state for the starting position: one even region of 60 cells.
    pub const fn new() -> Self {
        let mut flip_histogram = [Bitboard::EMPTY; HISTOGRAM_BUCKETS];
        flip_histogram[0] = Bitboard::from_raw(CENTER);

        Self {
            odd_area: Bitboard::EMPTY,
            even_area: Bitboard::from_raw(START_EMPTIES),
            odd_count: 0,
            even_count: 1,
            early_turn: true,
            flip_histogram,
        }
    }

    /// Recompute the regions of a board from scratch.
    ///
    /// The change history of a board is unknown, so every stone is put in the
    /// first histogram bucket. For the starting board this equals [`ParityState::new()`].
    pub fn from_board(board: Board) -> Self {
        let occupied = board.occupied_mask();
        let mut flip_histogram = [Bitboard::EMPTY; HISTOGRAM_BUCKETS];
        flip_histogram[0] = occupied;

        let mut state = Self {
            odd_area: Bitboard::EMPTY,
            even_area: Bitboard::EMPTY,
            odd_count: 0,
            even_count: 0,
            early_turn: !occupied.intersects(RING),
            flip_histogram,
        };

        if state.early_turn {
            state.tag_single_region(!occupied);
        } else {
            state.partition_all(!occupied);
        }

        state
    }

    /// All empty cells known to the regions.
    #[inline]
    pub fn empty_area(&self) -> Bitboard {
        self.odd_area | self.even_area
    }

    /// Update the state after a stone is placed at `mv`, flipping `flips`.
    pub fn advance(&mut self, mv: Location, flips: Bitboard) {
        self.record_changes(mv.bitboard() | flips);

        let cell = mv.bitboard();
        if self.early_turn {
            let empties = self.empty_area() & !cell;
            self.early_turn = !cell.intersects(RING);
            if self.early_turn {
                self.tag_single_region(empties);
            } else {
                // Pockets may already be sealed off behind the ring.
                self.odd_area = Bitboard::EMPTY;
                self.even_area = Bitboard::EMPTY;
                self.odd_count = 0;
                self.even_count = 0;
                self.partition_all(empties);
            }
            return;
        }

        let mut area = if self.odd_area.intersects(cell) {
            self.odd_area ^= cell;
            self.odd_count -= 1;
            self.odd_area
        } else {
            debug_assert!(self.even_area.intersects(cell));
            self.even_area ^= cell;
            self.even_count -= 1;
            self.even_area
        };

        // The played cell's region may have split into up to four parts.
        for &seed in neighbors(cell.into()).iter() {
            let seed = Bitboard::from(seed);
            if area.intersects(seed) {
                let part = partition_scan(area, seed);
                self.odd_area &= !part;
                self.even_area &= !part;
                self.classify(part);
                area ^= part;
            }
        }
    }

    /// Ripple-increment the change count of every cell in `changed`.
    fn record_changes(&mut self, changed: Bitboard) {
        let counted = self
            .flip_histogram
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bucket| acc | bucket);

        // Top-down, so that no cell moves up twice.
        for k in (0..HISTOGRAM_BUCKETS - 1).rev() {
            let moving = self.flip_histogram[k] & changed;
            self.flip_histogram[k] ^= moving;
            self.flip_histogram[k + 1] |= moving;
        }

        self.flip_histogram[0] |= changed & !counted;
    }

    /// Treat all of `empties` as one region.
    fn tag_single_region(&mut self, empties: Bitboard) {
        if empties.count_occupied() % 2 == 1 {
            self.odd_area = empties;
            self.even_area = Bitboard::EMPTY;
            self.odd_count = 1;
            self.even_count = 0;
        } else {
            self.odd_area = Bitboard::EMPTY;
            self.even_area = empties;
            self.odd_count = 0;
            self.even_count = 1;
        }
    }

    /// Split `empties` into regions, adding each one to the state.
    fn partition_all(&mut self, empties: Bitboard) {
        let mut remaining = empties;
        while !remaining.is_empty() {
            let seed = Bitboard::from(bits::rightmost_bit(remaining.into()));
            let part = partition_scan(remaining, seed);
            self.classify(part);
            remaining ^= part;
        }
    }

    /// Add one region to the area matching its size parity.
    fn classify(&mut self, part: Bitboard) {
        if part.count_occupied() % 2 == 1 {
            self.odd_area |= part;
            self.odd_count += 1;
        } else {
            self.even_area |= part;
            self.even_count += 1;
        }
    }
}

/// The up, down, left and right neighbors of a one-hot cell.
/// Neighbors that would fall off the board are empty.
#[inline]
fn neighbors(cell: u64) -> [u64; 4] {
    [
        cell << 8,
        cell >> 8,
        (cell & NOT_LEFT_EDGE) << 1,
        (cell >> 1) & NOT_LEFT_EDGE,
    ]
}

/// Mask of the row containing a one-hot cell.
#[inline]
fn row_of(cell: u64) -> u64 {
    let row = bits::index_of(cell) / 8;
    0xff << (8 * (7 - row))
}

/// Grow `seed` left and right through `row` into a contiguous run.
/// `row` must lie within a single row of the board.
#[inline]
fn scan_line(row: u64, seed: u64) -> u64 {
    let mut line = seed;
    loop {
        let grown = line | ((line << 1 | line >> 1) & row);
        if grown == line {
            return line;
        }
        line = grown;
    }
}

/// Find the connected part of `area` containing the one-hot `seed`.
///
/// A scanline fill: runs are grown horizontally, and every claimed run is
/// checked for unclaimed cells directly above and below it. Pending runs are
/// kept on a fixed-size stack.
pub fn partition_scan(area: Bitboard, seed: Bitboard) -> Bitboard {
    let area = u64::from(area);
    let seed = u64::from(seed);
    debug_assert!(area & seed != 0);

    let first = scan_line(area & row_of(seed), seed);
    let mut part = first;
    let mut remaining = area ^ first;

    let mut pending = ArrayVec::<[u64; MAX_RUNS]>::new();
    pending.push(first);

    while let Some(line) = pending.pop() {
        for &adjacent in [line << 8, line >> 8].iter() {
            let mut candidates = remaining & adjacent;
            while candidates != 0 {
                let start = bits::rightmost_bit(candidates);
                let run = scan_line(remaining & row_of(start), start);
                part |= run;
                remaining ^= run;
                candidates &= !run;
                pending.push(run);
            }
        }
    }

    Bitboard::from(part)
}
