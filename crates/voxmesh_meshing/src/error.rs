//! # Meshing Error Types
//!
//! All errors that can occur while configuring or running a mesher.

use thiserror::Error;
use voxmesh_core::GridError;

/// Errors that can occur in the meshing system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The grid violated its addressing contract during meshing.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read config {path}: {reason}")]
    ConfigIo {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// An attribute or palette table outgrew 32-bit indices.
    #[error("{table} table exceeds the u32 index range")]
    IndexOverflow {
        /// Which table overflowed.
        table: &'static str,
    },
}

/// Result type for meshing operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Converts a table position to a 32-bit index.
///
/// Every index handed out by the builder, flat buffers and palette goes
/// through here.
pub(crate) fn checked_index(position: usize, table: &'static str) -> MeshResult<u32> {
    u32::try_from(position).map_err(|_| MeshError::IndexOverflow { table })
}
