//! Incremental growth of the road network.
//!
//! The cells to reach are visited once, in the order chosen by [crate::ordering]. A cell lying
//! within skidding distance of the current network is skipped. Any other cell is routed to the
//! cheapest cell of the network, and the new road immediately becomes part of the network, so
//! later cells can connect to it. The visiting order therefore shapes the resulting network.

use log::{debug, info};

use crate::cell::Cell;
use crate::config::NetworkConfig;
use crate::connected::{CellSet, ConnectedSet};
use crate::cost_grid::CostGrid;
use crate::error::{NetworkError, NetworkResult};
use crate::feedback::Feedback;
use crate::geo::GeoTransform;
use crate::ordering::{order, OrderingOptions};
use crate::search::{DijkstraSolver, PathResult, SearchOutcome};

/// A road accepted into the network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    /// Construction order, starting at 1.
    pub id: usize,
    pub path: PathResult,
    pub total_cost: f64,
}

impl RoadSegment {
    pub fn cells(&self) -> &[Cell] {
        &self.path.cells
    }

    /// World coordinates of the cell centres along the road.
    pub fn to_polyline(&self, geo: &GeoTransform) -> Vec<[f64; 2]> {
        self.path.cells.iter().map(|c| geo.cell_center(c)).collect()
    }
}

/// The roads built by a run, in construction order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadNetwork {
    pub segments: Vec<RoadSegment>,
    /// Cells to reach that were already within skidding distance when visited.
    pub skipped: usize,
}

impl RoadNetwork {
    pub fn len(&self) -> usize {
        self.segments.len()
    }
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    pub fn total_cost(&self) -> f64 {
        self.segments.iter().map(|s| s.total_cost).sum()
    }
    pub fn iter(&self) -> impl Iterator<Item = &RoadSegment> {
        self.segments.iter()
    }
}

/// Result of visiting a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Visit {
    /// The cell was within skidding distance of the network, at the given distance.
    Skipped(f64),
    /// A road was built, with the given id.
    Connected(usize),
}

/// State of a growing network: the connected set it owns and the roads accepted so far.
#[derive(Debug)]
pub struct NetworkGrowth<'a> {
    grid: &'a CostGrid,
    solver: DijkstraSolver,
    skidding_distance: f64,
    connected: ConnectedSet,
    network: RoadNetwork,
}

impl<'a> NetworkGrowth<'a> {
    pub fn new(
        grid: &'a CostGrid,
        connected: ConnectedSet,
        solver: DijkstraSolver,
        skidding_distance: f64,
    ) -> NetworkGrowth<'a> {
        NetworkGrowth {
            grid,
            solver,
            skidding_distance,
            connected,
            network: RoadNetwork::default(),
        }
    }

    pub fn connected(&self) -> &ConnectedSet {
        &self.connected
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// Visits one cell to reach. Only a cell strictly farther than the skidding distance gets a
    /// road; on success every cell of that road joins the connected set.
    pub fn visit<F: Feedback + ?Sized>(
        &mut self,
        cell: Cell,
        feedback: &mut F,
    ) -> NetworkResult<Visit> {
        let distance = self.connected.distance_to(&cell);
        if distance <= self.skidding_distance {
            self.network.skipped += 1;
            return Ok(Visit::Skipped(distance));
        }
        let outcome = self.solver.shortest_path(
            self.grid,
            cell,
            self.connected.cells(),
            || feedback.is_cancelled(),
        );
        match outcome {
            SearchOutcome::Found(path) => {
                let id = self.network.segments.len() + 1;
                let total_cost = path.total_cost();
                let added = self.connected.extend(path.cells.iter().copied());
                debug!(
                    "Road {} from {} to {} costs {}, {} new network cells",
                    id, cell, path.reached, total_cost, added
                );
                self.network.segments.push(RoadSegment {
                    id,
                    path,
                    total_cost,
                });
                Ok(Visit::Connected(id))
            }
            SearchOutcome::Unreachable => Err(NetworkError::Unreachable(cell)),
            SearchOutcome::Cancelled => Err(NetworkError::Cancelled),
        }
    }

    pub fn finish(self) -> RoadNetwork {
        self.network
    }
}

/// Builds road networks on a cost grid with a fixed configuration.
#[derive(Clone, Debug)]
pub struct NetworkBuilder<'a> {
    grid: &'a CostGrid,
    geo: GeoTransform,
    config: NetworkConfig,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(
        grid: &'a CostGrid,
        geo: GeoTransform,
        config: NetworkConfig,
    ) -> NetworkResult<NetworkBuilder<'a>> {
        config.validate()?;
        Ok(NetworkBuilder { grid, geo, config })
    }

    /// Rejects empty or overlapping inputs and cells that lie outside the grid.
    pub fn validate_inputs(&self, to_reach: &CellSet, roads: &CellSet) -> NetworkResult<()> {
        if to_reach.is_empty() {
            return Err(NetworkError::NoCellsToReach);
        }
        if roads.is_empty() {
            return Err(NetworkError::NoRoadsToConnectTo);
        }
        if let Some(cell) = to_reach
            .iter()
            .chain(roads.iter())
            .find(|c| !self.grid.in_bounds(c))
        {
            return Err(NetworkError::CellOutOfBounds {
                cell: *cell,
                height: self.grid.height(),
                width: self.grid.width(),
            });
        }
        let mut overlap = to_reach.intersection(roads);
        if let Some(first) = overlap.next() {
            return Err(NetworkError::OverlappingInputs {
                first: *first,
                count: 1 + overlap.count(),
            });
        }
        Ok(())
    }

    /// Connects every cell of `to_reach` to the network seeded by `roads`. Fails as a whole if a
    /// cell cannot be connected or if `feedback` cancels the run; no partial network is returned.
    pub fn build<F: Feedback + ?Sized>(
        &self,
        to_reach: &CellSet,
        roads: &CellSet,
        feedback: &mut F,
    ) -> NetworkResult<RoadNetwork> {
        self.validate_inputs(to_reach, roads)?;
        info!(
            "Building a road network for {} cells to reach and {} road cells ({} order)",
            to_reach.len(),
            roads.len(),
            self.config.method
        );
        let connected = ConnectedSet::from_cells(roads.iter().copied(), self.geo);
        let options = OrderingOptions {
            seed: self.config.seed,
            parallel: self.config.parallel_ordering,
        };
        let visit_order = order(to_reach, &connected, self.config.method, options, feedback)?;
        feedback.push_info("Ordering is done !");

        feedback.push_info("Generating the road network...");
        let mut growth = NetworkGrowth::new(
            self.grid,
            connected,
            DijkstraSolver::new(self.config.poll_interval),
            self.config.skidding_distance,
        );
        let total = visit_order.len() as f64;
        for (i, cell) in visit_order.into_iter().enumerate() {
            growth.visit(cell, feedback)?;
            feedback.set_progress(100.0 * (i + 1) as f64 / total);
        }
        feedback.set_progress(100.0);
        let network = growth.finish();
        feedback.push_info(&format!(
            "Network created ! {} roads built, {} cells within skidding distance",
            network.len(),
            network.skipped
        ));
        for segment in network.iter() {
            feedback.push_info(&format!(
                "Cost of road {} : {}",
                segment.id, segment.total_cost
            ));
        }
        Ok(network)
    }
}
