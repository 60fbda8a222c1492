//! # forest_road_network
//!
//! Incremental generation of a least-cost road network over a cost raster. Cells of the areas to
//! access are connected one by one to the existing roads with a multi-target
//! [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) search that stops at the
//! cheapest road cell it settles. Every accepted road joins the network straight away, so later
//! searches can end on it, and cells within skidding distance of the network need no road at
//! all. The order in which cells are visited (random, closest first, farthest first) therefore
//! changes the resulting network.
//!
//! Blocked ("no data") cells are never traversed. Pre-computed
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) of the
//! passable cells avoid flood-filling the grid when no road can be reached.
pub mod cell;
pub mod config;
pub mod connected;
pub mod cost_grid;
pub mod dijkstra;
pub mod error;
pub mod feedback;
pub mod geo;
pub mod network;
pub mod ordering;
pub mod search;

pub use cell::{Cell, Connectivity};
pub use config::{GenerationMethod, NetworkConfig};
pub use connected::{cell_set, CellSet, ConnectedSet};
pub use cost_grid::CostGrid;
pub use error::{NetworkError, NetworkResult};
pub use feedback::{CancelFlag, Feedback, LogFeedback};
pub use geo::GeoTransform;
pub use network::{NetworkBuilder, NetworkGrowth, RoadNetwork, RoadSegment, Visit};
pub use ordering::{order, OrderingOptions};
pub use search::{Cost, DijkstraSolver, PathResult, SearchOutcome};

const N_SMALLVEC_SIZE: usize = 8;
/// Frontier pops between two cancellation polls unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: usize = 1024;
pub const DEFAULT_SKIDDING_DISTANCE: f64 = 100.0;

/// Builds the road network connecting `to_reach` to `roads` in one call.
pub fn build_road_network<F: Feedback + ?Sized>(
    grid: &CostGrid,
    geo: GeoTransform,
    to_reach: &CellSet,
    roads: &CellSet,
    config: NetworkConfig,
    feedback: &mut F,
) -> NetworkResult<RoadNetwork> {
    NetworkBuilder::new(grid, geo, config)?.build(to_reach, roads, feedback)
}
