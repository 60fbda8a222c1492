use core::fmt;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, Connectivity};
use crate::error::{NetworkError, NetworkResult};
use crate::N_SMALLVEC_SIZE;

/// [CostGrid] is the read-only cost raster the network is routed over. Every cell either holds a
/// finite non-negative traversal cost or is blocked ("no data"), in which case it is left out of
/// the implicit graph entirely. Connected components of the passable cells are kept in a
/// [UnionFind] structure so that hopeless searches are rejected without flood-filling the grid.
#[derive(Clone, Debug)]
pub struct CostGrid {
    height: usize,
    width: usize,
    costs: Vec<Option<f64>>,
    connectivity: Connectivity,
    components: UnionFind<usize>,
}

impl CostGrid {
    /// Builds a grid from row-major costs, [None] marking blocked cells.
    pub fn new(height: usize, width: usize, costs: Vec<Option<f64>>) -> NetworkResult<CostGrid> {
        if height == 0 || width == 0 {
            return Err(NetworkError::InvalidGridData(format!(
                "grid dimensions must be positive, got {height}x{width}"
            )));
        }
        let expected = height.checked_mul(width).ok_or_else(|| {
            NetworkError::InvalidGridData(format!("grid of {height}x{width} cells is too large"))
        })?;
        if costs.len() != expected {
            return Err(NetworkError::InvalidGridData(format!(
                "expected {expected} cell values for a {height}x{width} grid, got {}",
                costs.len()
            )));
        }
        if let Some((ix, value)) = costs
            .iter()
            .enumerate()
            .find_map(|(ix, c)| c.filter(|v| !v.is_finite() || *v < 0.0).map(|v| (ix, v)))
        {
            let cell = Cell::new(ix / width, ix % width);
            return Err(NetworkError::InvalidGridData(format!(
                "cost raster contains value {value} at {cell}, costs must be finite and non-negative"
            )));
        }
        let mut grid = CostGrid {
            height,
            width,
            costs,
            connectivity: Connectivity::default(),
            components: UnionFind::new(0),
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Builds a grid from a raster block given as rows, top row first.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> NetworkResult<CostGrid> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(NetworkError::InvalidGridData(format!(
                "row {r} has {} values, expected {width}",
                row.len()
            )));
        }
        CostGrid::new(height, width, rows.into_iter().flatten().collect())
    }

    /// A grid where every cell has the same cost.
    pub fn uniform(height: usize, width: usize, cost: f64) -> NetworkResult<CostGrid> {
        CostGrid::new(height, width, vec![Some(cost); height.saturating_mul(width)])
    }

    /// Switches the adjacency model, regenerating the components accordingly.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> CostGrid {
        if self.connectivity != connectivity {
            self.connectivity = connectivity;
            self.generate_components();
        }
        self
    }

    pub fn height(&self) -> usize {
        self.height
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    fn get_ix(&self, cell: &Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// Cost of entering the cell, [None] if it is blocked or outside the raster.
    pub fn cost(&self, cell: &Cell) -> Option<f64> {
        if self.in_bounds(cell) {
            self.costs[self.get_ix(cell)]
        } else {
            None
        }
    }

    pub fn is_blocked(&self, cell: &Cell) -> bool {
        self.cost(cell).is_none()
    }

    /// Cost of a single move. Only the destination cost is charged, the cost of the cell being
    /// left plays no part.
    pub fn step_cost(&self, from: &Cell, to: &Cell) -> Option<f64> {
        if self.is_blocked(from) || !from.is_adjacent(to, self.connectivity) {
            return None;
        }
        self.cost(to)
    }

    /// Passable neighbours of a passable cell. Blocked cells have no neighbours at all.
    pub fn neighbors(&self, cell: &Cell) -> SmallVec<[Cell; N_SMALLVEC_SIZE]> {
        if self.is_blocked(cell) {
            return SmallVec::new();
        }
        self.connectivity
            .neighborhood(cell, self.height, self.width)
            .into_iter()
            .filter(|n| !self.is_blocked(n))
            .collect()
    }

    /// Passable neighbours together with the cost of moving onto them.
    pub fn neighbors_and_cost(&self, cell: &Cell) -> SmallVec<[(Cell, f64); N_SMALLVEC_SIZE]> {
        if self.is_blocked(cell) {
            return SmallVec::new();
        }
        self.connectivity
            .neighborhood(cell, self.height, self.width)
            .into_iter()
            .filter_map(|n| self.cost(&n).map(|c| (n, c)))
            .collect()
    }

    /// Total cost of walking the given path, [None] if it is not a valid path on this grid.
    pub fn path_cost(&self, path: &[Cell]) -> Option<f64> {
        let first = path.first()?;
        if self.is_blocked(first) {
            return None;
        }
        path.windows(2)
            .try_fold(0.0, |acc, step| Some(acc + self.step_cost(&step[0], &step[1])?))
    }

    /// Retrieves the component id a given [Cell] belongs to, [None] for blocked cells and cells
    /// outside the raster.
    pub fn get_component(&self, cell: &Cell) -> Option<usize> {
        if self.is_blocked(cell) {
            None
        } else {
            Some(self.components.find(self.get_ix(cell)))
        }
    }

    /// Checks if start and goal are passable and on the same connected component.
    pub fn reachable(&self, start: &Cell, goal: &Cell) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Cell, goal: &Cell) -> bool {
        match (self.get_component(start), self.get_component(goal)) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours to the same
    /// components.
    fn generate_components(&mut self) {
        info!(
            "Generating connected components of a {}x{} cost grid",
            self.height, self.width
        );
        self.components = UnionFind::new(self.height * self.width);
        // Looking forward only is enough to visit every undirected edge once.
        let forward: &[(isize, isize)] = match self.connectivity {
            Connectivity::Moore => &[(0, 1), (1, -1), (1, 0), (1, 1)],
            Connectivity::VonNeumann => &[(0, 1), (1, 0)],
        };
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = Cell::new(row, col);
                if self.is_blocked(&cell) {
                    continue;
                }
                let parent_ix = self.get_ix(&cell);
                for &(d_row, d_col) in forward {
                    if let Some(n) = cell.offset(d_row, d_col) {
                        if !self.is_blocked(&n) {
                            let ix = self.get_ix(&n);
                            self.components.union(parent_ix, ix);
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for CostGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cost grid ({}x{}):", self.height, self.width)?;
        for row in 0..self.height {
            let values = (0..self.width)
                .map(|col| match self.cost(&Cell::new(row, col)) {
                    Some(c) => format!("{c}"),
                    None => "#".to_owned(),
                })
                .collect::<Vec<String>>();
            writeln!(f, "{}", values.join(" "))?;
        }
        Ok(())
    }
}
