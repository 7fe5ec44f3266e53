//! Text helpers shared by the board types.

use crate::{EDGE_LENGTH, NUM_SPACES};
use std::fmt::{self, Formatter};

const COLUMN_LABELS: &str = "ABCDEFGH";

/// Format 64 characters into a labelled 8x8 grid.
/// `cells` must yield exactly 64 items, in row-major order.
pub fn format_grid<T: Iterator<Item = char>>(mut cells: T, f: &mut Formatter) -> fmt::Result {
    f.write_str("  ")?;
    for label in COLUMN_LABELS.chars() {
        write!(f, " {}", label)?;
    }

    for row in 0..EDGE_LENGTH {
        write!(f, "\n {} ", row + 1)?;
        for _ in 0..EDGE_LENGTH {
            write!(f, "{} ", cells.next().ok_or(fmt::Error)?)?;
        }
    }

    match cells.next() {
        None => Ok(()),
        _ => Err(fmt::Error),
    }
}

/// Collect the non-whitespace characters of a 64-cell board string.
/// Returns the number of cells found if there are not exactly 64.
pub fn grid_cells(s: &str) -> Result<Vec<char>, usize> {
    let cells: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    match cells.len() {
        NUM_SPACES => Ok(cells),
        found => Err(found),
    }
}
