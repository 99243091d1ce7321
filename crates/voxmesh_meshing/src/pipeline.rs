//! Conversion glue between file formats and the meshers.
//!
//! Format parsing and mesh writing live outside this crate. A
//! [`VoxelLoader`] fills a fresh grid and hands back its palette, a
//! [`MeshExporter`] writes the result. [`convert`] runs one file,
//! [`convert_batch`] runs many and keeps going after failures.

use std::error::Error as StdError;
use std::time::Instant;

use thiserror::Error;
use voxmesh_core::VoxelGrid;

use crate::config::MeshConfig;
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::mesher::{Mesher, VoxelMesher};
use crate::palette::Palette;

/// Populates a grid from some voxel source.
///
/// Implementations call [`VoxelGrid::set_size`] first, then
/// [`VoxelGrid::set_voxel`] for every occupied cell.
pub trait VoxelLoader {
    /// Load failure.
    type Error: StdError + 'static;

    /// Fills `grid` and returns the palette its colour indices refer to.
    ///
    /// # Errors
    ///
    /// Any failure reading or decoding the source.
    fn load(&mut self, grid: &VoxelGrid) -> Result<Palette, Self::Error>;
}

/// Consumes a finished mesh.
pub trait MeshExporter {
    /// Export failure.
    type Error: StdError + 'static;

    /// Writes `mesh`, using `palette` for colour and material data.
    ///
    /// # Errors
    ///
    /// Any failure encoding or writing the output.
    fn export(&mut self, mesh: &Mesh, palette: &Palette) -> Result<(), Self::Error>;
}

/// Failure of one conversion, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum ConversionError<L, E>
where
    L: StdError + 'static,
    E: StdError + 'static,
{
    /// The loader failed; nothing was meshed.
    #[error("load failed: {0}")]
    Load(#[source] L),

    /// The mesher rejected the loaded grid.
    #[error("meshing failed: {0}")]
    Mesh(#[from] MeshError),

    /// The exporter failed.
    #[error("export failed: {0}")]
    Export(#[source] E),
}

/// Summary of one successful conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Voxels loaded.
    pub voxels: usize,
    /// Quads emitted.
    pub quads: usize,
    /// Unique positions in the mesh.
    pub vertices: usize,
    /// Triangles across all face groups.
    pub triangles: usize,
}

impl ConversionReport {
    fn new(voxels: usize, mesh: &Mesh) -> Self {
        Self {
            voxels,
            quads: mesh.quad_count(),
            vertices: mesh.vertices.len(),
            triangles: mesh.triangle_count(),
        }
    }
}

/// Loads one source into a fresh grid, meshes it and exports the result.
///
/// # Errors
///
/// Returns the first failing stage. A load failure returns before the
/// mesher runs.
pub fn convert<L, M, E>(
    loader: &mut L,
    mesher: &mut M,
    exporter: &mut E,
) -> Result<ConversionReport, ConversionError<L::Error, E::Error>>
where
    L: VoxelLoader,
    M: VoxelMesher + ?Sized,
    E: MeshExporter,
{
    let grid = VoxelGrid::new();
    let palette = loader.load(&grid).map_err(ConversionError::Load)?;
    let mesh = mesher.generate_mesh(&grid, &palette)?;
    exporter
        .export(&mesh, &palette)
        .map_err(ConversionError::Export)?;

    Ok(ConversionReport::new(grid.voxel_count(), &mesh))
}

/// One named unit of work for [`convert_batch`].
#[derive(Debug)]
pub struct ConversionJob<L, E> {
    /// Label used in logs and results, usually the input path.
    pub name: String,
    /// Source of voxels.
    pub loader: L,
    /// Sink for the mesh.
    pub exporter: E,
}

impl<L, E> ConversionJob<L, E> {
    /// Creates a job.
    pub fn new(name: impl Into<String>, loader: L, exporter: E) -> Self {
        Self {
            name: name.into(),
            loader,
            exporter,
        }
    }
}

/// Outcome of one batch job.
#[derive(Debug)]
pub struct BatchItem<L, E>
where
    L: StdError + 'static,
    E: StdError + 'static,
{
    /// Job name.
    pub name: String,
    /// Report or the stage that failed.
    pub result: Result<ConversionReport, ConversionError<L, E>>,
}

/// Runs every job in order with a fresh grid and mesher each, continuing
/// past failures. Results are returned in job order.
pub fn convert_batch<L, E, I>(jobs: I, config: &MeshConfig) -> Vec<BatchItem<L::Error, E::Error>>
where
    L: VoxelLoader,
    E: MeshExporter,
    I: IntoIterator<Item = ConversionJob<L, E>>,
{
    let started = Instant::now();
    let mut results = Vec::new();

    for mut job in jobs {
        let mut mesher = Mesher::from_config(config);
        let result = convert(&mut job.loader, &mut mesher, &mut job.exporter);
        if let Err(e) = &result {
            tracing::warn!(job = %job.name, error = %e, "conversion failed");
        }
        results.push(BatchItem {
            name: job.name,
            result,
        });
    }

    let failed = results.iter().filter(|item| item.result.is_err()).count();
    tracing::info!(
        mesher = %config.mesher,
        total = results.len(),
        failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch conversion finished"
    );
    results
}
