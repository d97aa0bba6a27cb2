use ninterp::error::{InterpolateError, ValidateError};
use thiserror::Error;

use crate::table::TableError;

/// Errors that can occur when building or querying a density field.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("snapshot series is empty")]
    Empty,

    #[error("need at least 2 snapshots to interpolate in time, got {0}")]
    TooFewSnapshots(usize),

    #[error("snapshot {index} has {found} densities, grid has {expected} nodes")]
    GridMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("snapshot {index} at t = {time} does not follow the previous one")]
    NonIncreasingTime { index: usize, time: f64 },

    #[error("snapshot {index} has non-finite density {value} at node {node}")]
    NonFinite { index: usize, node: usize, value: f64 },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Validation(#[from] ValidateError),

    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}
