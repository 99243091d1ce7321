//! Simple mesher - one quad per visible voxel face.
//!
//! The baseline strategy: no merging, only exact-value interning of
//! attributes. Faces come straight from the visibility bits the grid keeps
//! up to date on every edit.

use std::time::Instant;

use voxmesh_core::{BoundingBox, Face, Voxel, VoxelStore};

use crate::builder::{MeshBuilder, Quad};
use crate::config::{MeshConfig, MesherKind};
use crate::error::MeshResult;
use crate::mesh::Mesh;
use crate::mesher::{cyclic_axes, finish, plan, Frame, VoxelMesher};
use crate::palette::Palette;

/// Emits every visible voxel face as its own quad.
#[derive(Debug, Clone)]
pub struct SimpleMesher {
    builder: MeshBuilder,
    config: MeshConfig,
}

impl SimpleMesher {
    /// Creates a simple mesher with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MeshConfig::with_mesher(MesherKind::Simple))
    }

    /// Creates a simple mesher; `config.mesher` is ignored.
    #[must_use]
    pub fn with_config(config: MeshConfig) -> Self {
        Self {
            builder: MeshBuilder::new(),
            config,
        }
    }

    fn voxel_face(frame: &Frame, voxel: &Voxel, face: Face) -> Quad {
        let axis = face.axis();
        let (a1, a2) = cyclic_axes(axis);
        let p = voxel.pos;
        let plane = p.axis(axis) + i32::from(face.is_positive());
        frame.face_quad(
            face,
            plane,
            (p.axis(a1), p.axis(a1) + 1),
            (p.axis(a2), p.axis(a2) + 1),
            voxel.color,
            voxel.material,
        )
    }
}

impl Default for SimpleMesher {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelMesher for SimpleMesher {
    fn kind(&self) -> MesherKind {
        MesherKind::Simple
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
            // Sorted so output order does not depend on hash map iteration.
            let mut voxels: Vec<&Voxel> = store
                .voxels()
                .filter(|v| v.is_visible() && target.contains(v.pos))
                .collect();
            voxels.sort_unstable_by_key(|v| v.pos);

            let added = voxels.into_iter().try_for_each(|voxel| {
                voxel.visible_faces().try_for_each(|face| {
                    let quad = Self::voxel_face(&frame, voxel, face);
                    self.builder.add_face(&quad, palette)
                })
            });
            if let Err(e) = added {
                self.builder.clear();
                return Err(e);
            }
        }

        Ok(finish(self.kind(), &mut self.builder, started, &self.config))
    }
}
