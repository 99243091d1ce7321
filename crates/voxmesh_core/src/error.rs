//! # Grid Error Types
//!
//! All errors that can occur while sizing or populating a voxel grid.

use thiserror::Error;

use crate::coords::GridPos;

/// Errors that can occur in the voxel grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A grid extent was negative.
    #[error("invalid dimension: extent {value} on axis {axis} must not be negative")]
    InvalidDimension {
        /// Axis index (0 = x, 1 = y, 2 = z).
        axis: usize,
        /// The rejected extent.
        value: i32,
    },

    /// A position lies outside the declared grid extents.
    #[error("index out of range: {pos} is outside grid of size {size}")]
    IndexOutOfRange {
        /// The offending position.
        pos: GridPos,
        /// Declared grid extents.
        size: GridPos,
    },
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
