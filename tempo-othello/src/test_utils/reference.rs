//! A slow, obviously-correct rule implementation that walks rays cell by cell.
//! Used as an oracle for the bit-parallel code in [`crate::bitboard`].

use crate::bitboard::Bitboard;
use crate::{Location, EDGE_LENGTH};

const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn step(loc: Location, (dr, dc): (isize, isize)) -> Option<Location> {
    let (row, col) = loc.to_coords();
    let row = row as isize + dr;
    let col = col as isize + dc;
    let edge = EDGE_LENGTH as isize;
    if (0..edge).contains(&row) && (0..edge).contains(&col) {
        Some(Location::from_coords(row as usize, col as usize))
    } else {
        None
    }
}

/// Opponent pieces flipped by the active player moving at `loc`.
pub fn flips(active: Bitboard, opponent: Bitboard, loc: Location) -> Bitboard {
    let mut flipped = Bitboard::EMPTY;
    if (active | opponent).intersects(loc.bitboard()) {
        return flipped;
    }

    for &direction in DIRECTIONS.iter() {
        let mut run = Bitboard::EMPTY;
        let mut cursor = loc;

        while let Some(next) = step(cursor, direction) {
            let cell = next.bitboard();
            if opponent.intersects(cell) {
                run |= cell;
                cursor = next;
            } else {
                if active.intersects(cell) {
                    flipped |= run;
                }
                break;
            }
        }
    }

    flipped
}

/// Every empty location where the active player flips at least one piece.
pub fn move_mask(active: Bitboard, opponent: Bitboard) -> Bitboard {
    (0..crate::NUM_SPACES as u8)
        .map(Location::from_index)
        .filter(|&loc| !flips(active, opponent, loc).is_empty())
        .fold(Bitboard::EMPTY, |mask, loc| mask | loc.bitboard())
}
