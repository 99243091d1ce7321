//! # Conversion Pipeline
//!
//! Loader → mesher → exporter with in-memory collaborators.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use voxmesh_core::{GridPos, VoxelGrid};
use voxmesh_meshing::{
    convert, convert_batch, ConversionError, ConversionJob, Mesh, MeshConfig, MeshExporter, Mesher,
    MesherKind, Palette, Rgba,
};

#[derive(Debug, Error, PartialEq, Eq)]
enum FormatError {
    #[error("truncated chunk at byte {0}")]
    Truncated(usize),
    #[error("grid rejected voxel")]
    Grid,
    #[error("disk full")]
    DiskFull,
}

/// Loader backed by a list of voxels, optionally failing midway.
struct MemoryLoader {
    size: [i32; 3],
    voxels: Vec<(GridPos, u32)>,
    fail_after: Option<usize>,
}

impl MemoryLoader {
    fn bar(len: i32) -> Self {
        Self {
            size: [len, 1, 1],
            voxels: (0..len).map(|x| (GridPos::new(x, 0, 0), 1)).collect(),
            fail_after: None,
        }
    }

    fn failing(mut self, after: usize) -> Self {
        self.fail_after = Some(after);
        self
    }
}

impl voxmesh_meshing::VoxelLoader for MemoryLoader {
    type Error = FormatError;

    fn load(&mut self, grid: &VoxelGrid) -> Result<Palette, FormatError> {
        grid.set_size(self.size).map_err(|_| FormatError::Grid)?;
        for (i, &(pos, color)) in self.voxels.iter().enumerate() {
            if self.fail_after == Some(i) {
                return Err(FormatError::Truncated(i * 4));
            }
            grid.set_voxel(pos, 0, color, false)
                .map_err(|_| FormatError::Grid)?;
        }
        Ok(Palette::from_colors(vec![
            Rgba::from_packed(0xFF00_0000),
            Rgba::from_packed(0xFF00_FF00),
        ]))
    }
}

/// Exporter that records every mesh it receives.
#[derive(Clone, Default)]
struct RecordingExporter {
    meshes: Arc<Mutex<Vec<Mesh>>>,
    fail: bool,
}

impl MeshExporter for RecordingExporter {
    type Error = FormatError;

    fn export(&mut self, mesh: &Mesh, _palette: &Palette) -> Result<(), FormatError> {
        if self.fail {
            return Err(FormatError::DiskFull);
        }
        self.meshes.lock().unwrap().push(mesh.clone());
        Ok(())
    }
}

/// Test: A clean conversion reports counts and hands the mesh to the exporter.
#[test]
fn test_convert_success() {
    let mut exporter = RecordingExporter::default();
    let mut mesher = Mesher::new(MesherKind::Greedy);

    let report = convert(&mut MemoryLoader::bar(3), &mut mesher, &mut exporter).unwrap();
    assert_eq!(report.voxels, 3);
    assert_eq!(report.quads, 6);
    assert_eq!(report.triangles, 12);

    let meshes = exporter.meshes.lock().unwrap();
    assert_eq!(meshes.len(), 1);
    // Colour 1 of 2 → u = 0.75.
    assert_eq!(meshes[0].uvs, vec![[0.75, 0.5]]);
}

/// Test: A loader failure stops the conversion before meshing or export.
#[test]
fn test_loader_failure_never_reaches_exporter() {
    let mut exporter = RecordingExporter::default();
    let mut mesher = Mesher::new(MesherKind::Simple);

    let err = convert(&mut MemoryLoader::bar(4).failing(2), &mut mesher, &mut exporter)
        .unwrap_err();
    assert!(matches!(err, ConversionError::Load(FormatError::Truncated(8))));
    assert_eq!(err.to_string(), "load failed: truncated chunk at byte 8");
    assert!(exporter.meshes.lock().unwrap().is_empty());
}

/// Test: Exporter errors are returned, not swallowed.
#[test]
fn test_exporter_failure_surfaces() {
    let mut exporter = RecordingExporter {
        fail: true,
        ..RecordingExporter::default()
    };
    let mut mesher = Mesher::new(MesherKind::Simple);

    let err = convert(&mut MemoryLoader::bar(1), &mut mesher, &mut exporter).unwrap_err();
    assert!(matches!(err, ConversionError::Export(FormatError::DiskFull)));
}

/// Test: A batch keeps going after a failed file and reports each result.
#[test]
fn test_batch_continues_after_failure() {
    let exporter = RecordingExporter::default();
    let jobs = vec![
        ConversionJob::new("a.vox", MemoryLoader::bar(2), exporter.clone()),
        ConversionJob::new("b.vox", MemoryLoader::bar(2).failing(0), exporter.clone()),
        ConversionJob::new("c.vox", MemoryLoader::bar(5), exporter.clone()),
    ];

    let results = convert_batch(jobs, &MeshConfig::with_mesher(MesherKind::Simple));
    let names: Vec<_> = results.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["a.vox", "b.vox", "c.vox"]);

    assert_eq!(results[0].result.as_ref().unwrap().quads, 10);
    assert!(matches!(
        results[1].result,
        Err(ConversionError::Load(FormatError::Truncated(0)))
    ));
    assert_eq!(results[2].result.as_ref().unwrap().voxels, 5);
    assert_eq!(exporter.meshes.lock().unwrap().len(), 2);
}
