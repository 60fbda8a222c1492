//! The set of cells already served by the road network.
//!
//! Membership is kept in an insertion-ordered [IndexSet] so that iteration is reproducible, and
//! cell centres are mirrored into an R-tree (via `rstar`) to answer "how far is the network from
//! this cell" without scanning every member.

use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::cell::Cell;
use crate::geo::{euclidean, GeoTransform};

pub type CellSet = IndexSet<Cell, FxBuildHasher>;

/// Collects cells into a [CellSet], keeping the first occurrence of duplicates.
pub fn cell_set<I: IntoIterator<Item = Cell>>(cells: I) -> CellSet {
    cells.into_iter().collect()
}

/// Entry stored in the R-tree: the world position of a cell centre and the cell itself.
#[derive(Clone, Debug, PartialEq)]
struct CellEntry {
    point: [f64; 2],
    cell: Cell,
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CellEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Cells reachable through the existing roads plus every road accepted so far. It only ever
/// grows.
#[derive(Clone, Debug)]
pub struct ConnectedSet {
    cells: CellSet,
    index: RTree<CellEntry>,
    geo: GeoTransform,
}

impl ConnectedSet {
    pub fn new(geo: GeoTransform) -> ConnectedSet {
        ConnectedSet {
            cells: CellSet::default(),
            index: RTree::new(),
            geo,
        }
    }

    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I, geo: GeoTransform) -> ConnectedSet {
        let cells = cell_set(cells);
        let entries = cells
            .iter()
            .map(|cell| CellEntry {
                point: geo.cell_center(cell),
                cell: *cell,
            })
            .collect();
        ConnectedSet {
            cells,
            index: RTree::bulk_load(entries),
            geo,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }
    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    /// Adds a cell, returning whether it was new.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let added = self.cells.insert(cell);
        if added {
            self.index.insert(CellEntry {
                point: self.geo.cell_center(&cell),
                cell,
            });
        }
        added
    }

    /// Adds every cell, returning how many were new.
    pub fn extend<I: IntoIterator<Item = Cell>>(&mut self, cells: I) -> usize {
        cells.into_iter().filter(|c| self.insert(*c)).count()
    }

    /// The member whose centre is closest to the centre of `cell`, with that distance.
    pub fn nearest(&self, cell: &Cell) -> Option<(Cell, f64)> {
        let query = self.geo.cell_center(cell);
        self.index
            .nearest_neighbor(&query)
            .map(|entry| (entry.cell, euclidean(&entry.point, &query)))
    }

    /// Minimum world distance from `cell` to any member, infinite for an empty set.
    pub fn distance_to(&self, cell: &Cell) -> f64 {
        self.nearest(cell).map_or(f64::INFINITY, |(_, d)| d)
    }
}
