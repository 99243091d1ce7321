//! # VOXMESH Core
//!
//! Sparse voxel grid feeding the meshers in `voxmesh_meshing`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Loader → set_size / set_voxel                           │
//! │              ↓                                           │
//! │  VoxelGrid (RwLock<VoxelStore>)                          │
//! │    ├── HashMap<GridPos, Voxel>   face bits per voxel     │
//! │    ├── visibility rules          6 neighbours per edit   │
//! │    └── Chunk summaries           16³ dirty tracking      │
//! │              ↓                                           │
//! │  Mesher reads via read() / snapshot()                    │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod coords;
pub mod error;
pub mod grid;
pub mod visibility;
pub mod voxel;

pub use chunk::{chunk_origin, Chunk, ChunkId, SurfaceKey, CHUNK_SIZE};
pub use coords::{BoundingBox, Face, GridPos};
pub use error::{GridError, GridResult};
pub use grid::{GridConfig, VoxelGrid, VoxelStore};
pub use voxel::Voxel;
