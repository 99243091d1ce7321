//! Greedy Meshing algorithm for voxel optimization.
//!
//! Reduces polygon count by merging adjacent coplanar faces with the same
//! material, colour and transparency.
//!
//! ## Algorithm
//!
//! 1. For each axis A (X, Y, Z), with the other two axes in cyclic order:
//! 2. Sweep every boundary plane between slice `p` and `p + 1`, from one
//!    before the first occupied slice to the last
//! 3. Build a 2D mask of visible faces, once per direction (+A from slice
//!    `p`, -A from slice `p + 1`)
//! 4. Scan the mask row-major; grow each hit right, then down, while cells
//!    match; clear the block and emit one quad
//! 5. Submit quads through the shared [`MeshBuilder`]
//!
//! Faces are taken from the grid's visibility bits, so the covered surface
//! is exactly the one the simple mesher draws.

use std::time::Instant;

use voxmesh_core::{BoundingBox, Face, GridPos, Voxel, VoxelStore};

use crate::builder::MeshBuilder;
use crate::config::{MeshConfig, MesherKind};
use crate::error::MeshResult;
use crate::mesh::Mesh;
use crate::mesher::{cyclic_axes, finish, plan, Frame, VoxelMesher};
use crate::palette::Palette;

/// Face mask entry for greedy meshing. Only equal cells merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceMask {
    material: u32,
    color: u32,
    transparent: bool,
}

impl FaceMask {
    fn from_voxel(voxel: &Voxel) -> Self {
        Self {
            material: voxel.material,
            color: voxel.color,
            transparent: voxel.transparent,
        }
    }
}

/// One slice through the target region.
#[derive(Debug, Clone, Copy)]
struct Slice {
    face: Face,
    /// Cell coordinate along the face axis.
    layer: i32,
    /// Edge index of the plane the quads lie on.
    plane: i32,
}

/// Greedy meshing engine.
///
/// Keeps its mask and builder buffers between calls to avoid reallocating.
#[derive(Debug, Clone)]
pub struct GreedyMesher {
    builder: MeshBuilder,
    mask: Vec<Option<FaceMask>>,
    config: MeshConfig,
}

impl GreedyMesher {
    /// Creates a greedy mesher with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MeshConfig::with_mesher(MesherKind::Greedy))
    }

    /// Creates a greedy mesher; `config.mesher` is ignored.
    #[must_use]
    pub fn with_config(config: MeshConfig) -> Self {
        Self {
            builder: MeshBuilder::new(),
            mask: Vec::new(),
            config,
        }
    }

    /// Meshes faces perpendicular to `axis`.
    fn mesh_axis(
        &mut self,
        store: &VoxelStore,
        palette: &Palette,
        target: &BoundingBox,
        frame: &Frame,
        axis: usize,
    ) -> MeshResult<()> {
        let first = target.min.axis(axis);
        let last = target.max.axis(axis);

        for plane in first - 1..=last {
            for positive in [true, false] {
                let layer = if positive { plane } else { plane + 1 };
                if layer < first || layer > last {
                    continue;
                }
                let slice = Slice {
                    face: Face::from_axis(axis, positive),
                    layer,
                    plane: plane + 1,
                };
                self.build_mask(store, target, slice);
                self.greedy_extract(palette, target, frame, slice)?;
            }
        }
        Ok(())
    }

    /// Builds the 2D mask of visible faces in one layer. Rows run along the
    /// second cyclic axis, columns along the first.
    #[allow(clippy::cast_possible_wrap)]
    fn build_mask(&mut self, store: &VoxelStore, target: &BoundingBox, slice: Slice) {
        let axis = slice.face.axis();
        let (a1, a2) = cyclic_axes(axis);
        let (width, height) = mask_dims(target, axis);

        self.mask.clear();
        self.mask.resize(width * height, None);

        let base = target.min.with_axis(axis, slice.layer);
        for v in 0..height {
            for u in 0..width {
                let pos: GridPos = base
                    .with_axis(a1, target.min.axis(a1) + u as i32)
                    .with_axis(a2, target.min.axis(a2) + v as i32);
                self.mask[v * width + u] = store
                    .get(pos)
                    .filter(|voxel| voxel.is_face_visible(slice.face))
                    .map(FaceMask::from_voxel);
            }
        }
    }

    /// Greedily extracts quads from the mask.
    #[allow(clippy::cast_possible_wrap)]
    fn greedy_extract(
        &mut self,
        palette: &Palette,
        target: &BoundingBox,
        frame: &Frame,
        slice: Slice,
    ) -> MeshResult<()> {
        let axis = slice.face.axis();
        let (a1, a2) = cyclic_axes(axis);
        let (width, height) = mask_dims(target, axis);

        for v in 0..height {
            let mut u = 0;
            while u < width {
                let Some(face) = self.mask[v * width + u] else {
                    u += 1;
                    continue;
                };

                // Find width - extend as far as possible with the same cell
                let mut w = 1;
                while u + w < width && self.mask[v * width + u + w] == Some(face) {
                    w += 1;
                }

                // Find height - extend rows with a matching run
                let mut h = 1;
                'height: while v + h < height {
                    for du in 0..w {
                        if self.mask[(v + h) * width + u + du] != Some(face) {
                            break 'height;
                        }
                    }
                    h += 1;
                }

                // Clear used cells from mask
                for dv in 0..h {
                    let row = (v + dv) * width + u;
                    self.mask[row..row + w].fill(None);
                }

                let u0 = target.min.axis(a1) + u as i32;
                let v0 = target.min.axis(a2) + v as i32;
                let quad = frame.face_quad(
                    slice.face,
                    slice.plane,
                    (u0, u0 + w as i32),
                    (v0, v0 + h as i32),
                    face.color,
                    face.material,
                );
                self.builder.add_face(&quad, palette)?;

                u += w;
            }
        }
        Ok(())
    }
}

/// Mask columns and rows for faces perpendicular to `axis`.
#[allow(clippy::cast_sign_loss)]
fn mask_dims(target: &BoundingBox, axis: usize) -> (usize, usize) {
    let (a1, a2) = cyclic_axes(axis);
    let extent = target.extent();
    (extent.axis(a1) as usize, extent.axis(a2) as usize)
}

impl Default for GreedyMesher {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelMesher for GreedyMesher {
    fn kind(&self) -> MesherKind {
        MesherKind::Greedy
    }

    fn mesh_store(
        &mut self,
        store: &VoxelStore,
        palette: &Palette,
        region: Option<BoundingBox>,
    ) -> MeshResult<Mesh> {
        let started = Instant::now();
        self.builder.clear();

        if let Some((target, frame)) = plan(store, region, &self.config)? {
            // X, Y, Z
            let swept = (0..3).try_for_each(|axis| {
                self.mesh_axis(store, palette, &target, &frame, axis)
            });
            if let Err(e) = swept {
                self.builder.clear();
                return Err(e);
            }
        }

        Ok(finish(self.kind(), &mut self.builder, started, &self.config))
    }
}
