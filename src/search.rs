use core::fmt;
use log::{debug, info};
use num_traits::Zero;
use std::cmp::Ordering;
use std::ops::Add;

use crate::cell::Cell;
use crate::connected::CellSet;
use crate::cost_grid::CostGrid;
use crate::dijkstra::{dijkstra_multi_target, Search};
use crate::DEFAULT_POLL_INTERVAL;

/// Accumulated path cost with a total order, so that it can key the search frontier. Grid
/// validation guarantees costs are finite and non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cost(pub f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for Cost {
    type Output = Cost;
    fn add(self, rhs: Cost) -> Cost {
        Cost(self.0 + rhs.0)
    }
}

impl Zero for Cost {
    fn zero() -> Cost {
        Cost(0.0)
    }
    fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

/// A least-cost path from a start cell to the member of the target set that was reached.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    /// Cells from the start to `reached`, both included.
    pub cells: Vec<Cell>,
    /// Accumulated cost at each cell of `cells`, starting at 0.
    pub cumulative_costs: Vec<f64>,
    pub reached: Cell,
}

impl PathResult {
    fn trivial(start: Cell) -> PathResult {
        PathResult {
            cells: vec![start],
            cumulative_costs: vec![0.0],
            reached: start,
        }
    }

    /// First cell of the path, [None] only for a hand-built path without cells.
    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn total_cost(&self) -> f64 {
        self.cumulative_costs.last().copied().unwrap_or(0.0)
    }

    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Whether the start already belonged to the targets.
    pub fn is_trivial(&self) -> bool {
        self.cells.len() <= 1
    }
}

/// Outcome of a single search.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Found(PathResult),
    Unreachable,
    Cancelled,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchOutcome::Found(p) => write!(
                f,
                "path of {} steps to {} costing {}",
                p.steps(),
                p.reached,
                p.total_cost()
            ),
            SearchOutcome::Unreachable => write!(f, "unreachable"),
            SearchOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Single-source, multi-target Dijkstra over a [CostGrid]. The search settles cells by
/// increasing accumulated cost and stops at the first target it settles, which is the cheapest
/// reachable one.
#[derive(Clone, Debug)]
pub struct DijkstraSolver {
    /// Number of frontier pops between two polls of the cancellation predicate.
    pub poll_interval: usize,
}

impl Default for DijkstraSolver {
    fn default() -> Self {
        DijkstraSolver {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl DijkstraSolver {
    pub fn new(poll_interval: usize) -> DijkstraSolver {
        DijkstraSolver { poll_interval }
    }

    /// Computes the cheapest path from `start` to any cell of `targets`. `cancelled` is polled
    /// while the frontier is expanded; once it returns true the search is abandoned.
    pub fn shortest_path<F>(
        &self,
        grid: &CostGrid,
        start: Cell,
        targets: &CellSet,
        cancelled: F,
    ) -> SearchOutcome
    where
        F: FnMut() -> bool,
    {
        if targets.contains(&start) {
            return SearchOutcome::Found(PathResult::trivial(start));
        }
        // Check if start and one of the targets are on the same connected component.
        if !targets.iter().any(|t| grid.reachable(&start, t)) {
            info!("No target is reachable from {}", start);
            return SearchOutcome::Unreachable;
        }
        let result = dijkstra_multi_target(
            &start,
            |cell| {
                grid.neighbors_and_cost(cell)
                    .into_iter()
                    .map(|(n, c)| (n, Cost(c)))
            },
            |cell| targets.contains(cell),
            cancelled,
            self.poll_interval,
        );
        match result {
            Search::Found(path) => {
                let (cells, costs): (Vec<Cell>, Vec<Cost>) = path.into_iter().unzip();
                let reached = cells[cells.len() - 1];
                debug!("Reached {} from {} in {} steps", reached, start, cells.len() - 1);
                SearchOutcome::Found(PathResult {
                    cells,
                    cumulative_costs: costs.into_iter().map(|c| c.0).collect(),
                    reached,
                })
            }
            Search::Exhausted => {
                log::warn!(
                    "Reachable target could not be pathed to from {}, are the components correct?",
                    start
                );
                SearchOutcome::Unreachable
            }
            Search::Cancelled => SearchOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Connectivity;
    use crate::connected::cell_set;

    fn found(outcome: SearchOutcome) -> PathResult {
        match outcome {
            SearchOutcome::Found(p) => p,
            other => panic!("expected a path, got {other}"),
        }
    }

    #[test]
    fn equal_start_goal() {
        let grid = CostGrid::uniform(1, 1, 1.0).unwrap();
        let start = Cell::new(0, 0);
        let path = found(DijkstraSolver::default().shortest_path(
            &grid,
            start,
            &cell_set([start]),
            || false,
        ));
        assert_eq!(path.cells, vec![start]);
        assert_eq!(path.cumulative_costs, vec![0.0]);
        assert_eq!(path.reached, start);
        assert!(path.is_trivial());
        assert_eq!(path.start(), Some(start));
    }

    #[test]
    fn empty_path_has_no_start() {
        let path = PathResult {
            cells: Vec::new(),
            cumulative_costs: Vec::new(),
            reached: Cell::new(0, 0),
        };
        assert_eq!(path.start(), None);
        assert_eq!(path.total_cost(), 0.0);
        assert_eq!(path.steps(), 0);
    }

    /// 5x5 grid of unit costs from the bottom-right corner to the top-left one.
    #[test]
    fn uniform_corner_to_corner() {
        let start = Cell::new(4, 4);
        let targets = cell_set([Cell::new(0, 0)]);
        for (connectivity, cells, cost) in
            [(Connectivity::Moore, 5, 4.0), (Connectivity::VonNeumann, 9, 8.0)]
        {
            let grid = CostGrid::uniform(5, 5, 1.0)
                .unwrap()
                .with_connectivity(connectivity);
            let path = found(DijkstraSolver::default().shortest_path(
                &grid,
                start,
                &targets,
                || false,
            ));
            assert_eq!(path.cells.len(), cells);
            assert_eq!(path.total_cost(), cost);
            assert_eq!(path.cells[0], start);
            assert_eq!(path.reached, Cell::new(0, 0));
            assert!(path
                .cells
                .windows(2)
                .all(|w| w[0].is_adjacent(&w[1], connectivity)));
        }
    }

    #[test]
    fn cost_is_charged_on_destination() {
        // |1 1 9|
        let grid = CostGrid::from_rows(vec![vec![Some(1.0), Some(1.0), Some(9.0)]]).unwrap();
        let path = found(DijkstraSolver::default().shortest_path(
            &grid,
            Cell::new(0, 0),
            &cell_set([Cell::new(0, 2)]),
            || false,
        ));
        assert_eq!(path.cumulative_costs, vec![0.0, 1.0, 10.0]);
    }

    /// The goal closest in steps is expensive to enter, so the farther one wins.
    #[test]
    fn cheapest_target_beats_nearest_target() {
        // |S 50 50 1|
        // |1 1  1  1|
        let grid = CostGrid::from_rows(vec![
            vec![Some(1.0), Some(50.0), Some(50.0), Some(1.0)],
            vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0)],
        ])
        .unwrap();
        let near = Cell::new(0, 2);
        let far = Cell::new(0, 3);
        let path = found(DijkstraSolver::default().shortest_path(
            &grid,
            Cell::new(0, 0),
            &cell_set([near, far]),
            || false,
        ));
        assert_eq!(path.reached, far);
        assert_eq!(path.total_cost(), 3.0);
    }

    #[test]
    fn blocked_target_is_never_entered() {
        // |S # T|
        let grid = CostGrid::from_rows(vec![vec![Some(1.0), None, Some(1.0)]]).unwrap();
        let outcome = DijkstraSolver::default().shortest_path(
            &grid,
            Cell::new(0, 0),
            &cell_set([Cell::new(0, 1), Cell::new(0, 2)]),
            || false,
        );
        assert_eq!(outcome, SearchOutcome::Unreachable);
    }

    #[test]
    fn ring_of_no_data_is_unreachable() {
        let mut rows = vec![vec![Some(1.0); 7]; 7];
        for i in 1..=5 {
            rows[1][i] = None;
            rows[5][i] = None;
            rows[i][1] = None;
            rows[i][5] = None;
        }
        let grid = CostGrid::from_rows(rows).unwrap();
        let outcome = DijkstraSolver::default().shortest_path(
            &grid,
            Cell::new(3, 3),
            &cell_set([Cell::new(0, 0)]),
            || false,
        );
        assert_eq!(outcome, SearchOutcome::Unreachable);
    }

    #[test]
    fn cancellation_after_first_pop() {
        let grid = CostGrid::uniform(20, 20, 1.0).unwrap();
        let mut polls = 0;
        let outcome = DijkstraSolver::new(1).shortest_path(
            &grid,
            Cell::new(19, 19),
            &cell_set([Cell::new(0, 0)]),
            || {
                polls += 1;
                polls > 1
            },
        );
        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(polls, 2);
    }

    #[test]
    fn equal_cost_ties_are_deterministic() {
        let grid = CostGrid::uniform(9, 9, 1.0).unwrap();
        let targets = cell_set([Cell::new(0, 0), Cell::new(0, 8), Cell::new(8, 0)]);
        let solver = DijkstraSolver::default();
        let first = solver.shortest_path(&grid, Cell::new(4, 4), &targets, || false);
        for _ in 0..5 {
            let again = solver.shortest_path(&grid, Cell::new(4, 4), &targets, || false);
            assert_eq!(first, again);
        }
    }
}
