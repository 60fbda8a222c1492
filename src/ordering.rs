//! Visiting order of the cells to reach.
//!
//! The order is fixed once, before the network grows: closest/farthest first rank cells by their
//! distance to the *initial* roads only. Ties keep the iteration order of the input set.

use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::cell::Cell;
use crate::config::GenerationMethod;
use crate::connected::{CellSet, ConnectedSet};
use crate::error::{NetworkError, NetworkResult};
use crate::feedback::Feedback;

/// Number of cells whose distance is computed between two cancellation polls.
const DISTANCE_CHUNK: usize = 256;

/// Settings of the ordering pass that do not select the method itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderingOptions {
    pub seed: Option<u64>,
    pub parallel: bool,
}

/// Orders `cells` according to `method`. Only the distance pass of the closest/farthest methods
/// can be cancelled.
pub fn order<F: Feedback + ?Sized>(
    cells: &CellSet,
    network: &ConnectedSet,
    method: GenerationMethod,
    options: OrderingOptions,
    feedback: &mut F,
) -> NetworkResult<Vec<Cell>> {
    match method {
        GenerationMethod::Random => {
            feedback.push_info("Randomizing order of cells to visit...");
            Ok(shuffled(cells, options.seed))
        }
        GenerationMethod::ClosestFirst | GenerationMethod::FarthestFirst => {
            feedback.push_info("Computing distances between polygons and roads...");
            let distances = distances_to_network(cells, network, options.parallel, feedback)?;
            feedback.push_info("Computing distances is done !");
            let ordered = if method == GenerationMethod::ClosestFirst {
                feedback.push_info("Ordering towards closest cells to visit...");
                cells
                    .iter()
                    .zip(distances)
                    .sorted_by(|a, b| a.1.total_cmp(&b.1))
            } else {
                feedback.push_info("Ordering towards farthest cells to visit...");
                cells
                    .iter()
                    .zip(distances)
                    .sorted_by(|a, b| b.1.total_cmp(&a.1))
            };
            Ok(ordered.map(|(cell, _)| *cell).collect())
        }
    }
}

fn shuffled(cells: &CellSet, seed: Option<u64>) -> Vec<Cell> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<Cell> = cells.iter().copied().collect();
    order.shuffle(&mut rng);
    order
}

/// Distance of every cell to the network, in the iteration order of `cells`.
pub fn distances_to_network<F: Feedback + ?Sized>(
    cells: &CellSet,
    network: &ConnectedSet,
    parallel: bool,
    feedback: &mut F,
) -> NetworkResult<Vec<f64>> {
    let cells: Vec<Cell> = cells.iter().copied().collect();
    let total = cells.len().max(1) as f64;
    let mut distances = Vec::with_capacity(cells.len());
    for chunk in cells.chunks(DISTANCE_CHUNK) {
        if feedback.is_cancelled() {
            debug!("Distance pass cancelled after {} cells", distances.len());
            return Err(NetworkError::Cancelled);
        }
        if parallel {
            let part: Vec<f64> = chunk.par_iter().map(|c| network.distance_to(c)).collect();
            distances.extend(part);
        } else {
            distances.extend(chunk.iter().map(|c| network.distance_to(c)));
        }
        feedback.set_progress(100.0 * distances.len() as f64 / total);
    }
    Ok(distances)
}
