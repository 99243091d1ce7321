//! # VOXMESH Meshing
//!
//! Turns a [`voxmesh_core::VoxelGrid`] into an indexed triangle mesh.
//!
//! ## Strategies
//!
//! - [`SimpleMesher`]: one quad per visible voxel face.
//! - [`GreedyMesher`]: sweeps each axis slice by slice and merges equal
//!   faces into maximal rectangles. Same surface, far fewer quads.
//!
//! Both submit quads through a [`MeshBuilder`], which interns positions,
//! normals and palette UVs and groups triangles by material.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use voxmesh_core::{GridPos, VoxelGrid};
//! use voxmesh_meshing::{Mesher, MesherKind, Palette, VoxelMesher};
//!
//! let grid = VoxelGrid::with_size([16, 16, 16])?;
//! grid.set_voxel(GridPos::new(1, 2, 3), 0, 0, false)?;
//!
//! let mut mesher = Mesher::new(MesherKind::Greedy);
//! let mesh = mesher.generate_mesh(&grid, &Palette::new())?;
//! assert_eq!(mesh.quad_count(), 6);
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod builder;
pub mod config;
pub mod error;
pub mod greedy;
pub mod mesh;
pub mod mesher;
pub mod palette;
pub mod pipeline;
pub mod simple;

pub use builder::{MeshBuilder, Quad};
pub use config::{MeshConfig, MesherKind};
pub use error::{MeshError, MeshResult};
pub use greedy::GreedyMesher;
pub use mesh::{triangle_normal, FaceGroup, FaceIndex, Mesh, MeshVertex};
pub use mesher::{Mesher, VoxelMesher};
pub use palette::{Palette, PaletteMaterial, Rgba};
pub use pipeline::{
    convert, convert_batch, BatchItem, ConversionError, ConversionJob, ConversionReport,
    MeshExporter, VoxelLoader,
};
pub use simple::SimpleMesher;
