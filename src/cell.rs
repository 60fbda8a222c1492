use core::fmt;
use smallvec::SmallVec;

use crate::N_SMALLVEC_SIZE;

/// A raster cell addressed by row and column. Rows grow downwards, so row 0 is the top of the
/// raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Offsets the cell, returning [None] if either coordinate would become negative.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Number of moves needed to go from one cell to another when diagonal moves are allowed.
    pub fn chebyshev_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Number of moves needed to go from one cell to another using only cardinal moves.
    pub fn manhattan_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether the two cells touch under the given [Connectivity].
    pub fn is_adjacent(&self, other: &Cell, connectivity: Connectivity) -> bool {
        match connectivity {
            Connectivity::Moore => self.chebyshev_distance(other) == 1,
            Connectivity::VonNeumann => self.manhattan_distance(other) == 1,
        }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Adjacency model of the grid graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// The 8 surrounding cells, diagonals included.
    #[default]
    Moore,
    /// The 4 cardinal neighbours only.
    VonNeumann,
}

static CARDINAL: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
static DIAGONAL: [(isize, isize); 4] = [(-1, 1), (1, 1), (1, -1), (-1, -1)];

impl Connectivity {
    /// Row/column offsets of the neighbourhood. Cardinal offsets come first so that equal-cost
    /// searches prefer straight moves.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> {
        let diagonals = match self {
            Connectivity::Moore => &DIAGONAL[..],
            Connectivity::VonNeumann => &DIAGONAL[..0],
        };
        CARDINAL.iter().chain(diagonals.iter()).copied()
    }

    /// Neighbourhood of a cell that lies inside a `height` x `width` raster.
    pub fn neighborhood(
        &self,
        cell: &Cell,
        height: usize,
        width: usize,
    ) -> SmallVec<[Cell; N_SMALLVEC_SIZE]> {
        self.offsets()
            .filter_map(|(d_row, d_col)| cell.offset(d_row, d_col))
            .filter(|c| c.row < height && c.col < width)
            .collect()
    }
}
