//! Error type of the network builder.

use thiserror::Error;

use crate::cell::Cell;

/// Fatal conditions surfaced by grid construction and network generation. Nothing is retried:
/// for fixed input every failure reproduces identically.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    #[error("invalid grid data: {0}")]
    InvalidGridData(String),

    #[error("there is no cell to reach inside the raster")]
    NoCellsToReach,

    #[error("there is no road cell to connect to inside the raster")]
    NoRoadsToConnectTo,

    #[error("{count} cell(s) to reach overlap the roads to connect to, first at {first}")]
    OverlappingInputs { first: Cell, count: usize },

    #[error("cell {cell} lies outside the {height}x{width} raster")]
    CellOutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("the road network is not reachable from cell {0}")]
    Unreachable(Cell),

    #[error("operation was cancelled")]
    Cancelled,
}

impl NetworkError {
    /// Whether the error stems from the inputs or configuration rather than from the search.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            NetworkError::NoCellsToReach
                | NetworkError::NoRoadsToConnectTo
                | NetworkError::OverlappingInputs { .. }
                | NetworkError::CellOutOfBounds { .. }
                | NetworkError::InvalidConfig(_)
        )
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;
