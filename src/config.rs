use core::fmt;
use std::str::FromStr;

use crate::error::{NetworkError, NetworkResult};
use crate::{DEFAULT_POLL_INTERVAL, DEFAULT_SKIDDING_DISTANCE};

/// Order in which the cells to reach are connected to the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerationMethod {
    /// Shuffled order, reproducible when a seed is configured.
    #[default]
    Random,
    /// Cells nearest to the initial roads first.
    ClosestFirst,
    /// Cells farthest from the initial roads first.
    FarthestFirst,
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            GenerationMethod::Random => "random",
            GenerationMethod::ClosestFirst => "closest first",
            GenerationMethod::FarthestFirst => "farthest first",
        };
        f.write_str(name)
    }
}

impl FromStr for GenerationMethod {
    type Err = NetworkError;

    /// Accepts the method names as well as their positions in the parameter list (0, 1, 2).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "0" | "random" => Ok(GenerationMethod::Random),
            "1" | "closest" | "closest first" => Ok(GenerationMethod::ClosestFirst),
            "2" | "farthest" | "farthest first" => Ok(GenerationMethod::FarthestFirst),
            _ => Err(NetworkError::InvalidConfig(format!(
                "unknown method of generation '{s}'"
            ))),
        }
    }
}

/// Parameters of a network generation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Maximum distance, in world units, a cell may lie from the network without needing a
    /// road of its own.
    pub skidding_distance: f64,
    pub method: GenerationMethod,
    /// Seed of the shuffle used by [GenerationMethod::Random].
    pub seed: Option<u64>,
    /// Frontier pops between two cancellation polls inside a search.
    pub poll_interval: usize,
    /// Computes the distances used for ordering on the rayon thread pool.
    pub parallel_ordering: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            skidding_distance: DEFAULT_SKIDDING_DISTANCE,
            method: GenerationMethod::default(),
            seed: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            parallel_ordering: false,
        }
    }
}

impl NetworkConfig {
    pub fn new(skidding_distance: f64, method: GenerationMethod) -> NetworkConfig {
        NetworkConfig {
            skidding_distance,
            method,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: usize) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_parallel_ordering(mut self, parallel: bool) -> Self {
        self.parallel_ordering = parallel;
        self
    }

    pub fn validate(&self) -> NetworkResult<()> {
        if !(self.skidding_distance >= 0.0) || self.skidding_distance.is_infinite() {
            return Err(NetworkError::InvalidConfig(format!(
                "skidding distance must be finite and non-negative, got {}",
                self.skidding_distance
            )));
        }
        if self.poll_interval == 0 {
            return Err(NetworkError::InvalidConfig(
                "poll interval must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
