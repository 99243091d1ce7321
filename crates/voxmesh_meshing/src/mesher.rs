//! Mesher selection and the geometry shared by both strategies.

use std::time::Instant;

use voxmesh_core::{BoundingBox, Face, VoxelGrid, VoxelStore};

use crate::builder::{MeshBuilder, Quad};
use crate::config::{MeshConfig, MesherKind};
use crate::error::MeshResult;
use crate::greedy::GreedyMesher;
use crate::mesh::Mesh;
use crate::palette::Palette;
use crate::simple::SimpleMesher;

/// Turns a voxel grid into a [`Mesh`].
///
/// Implementations hold no state across calls beyond reusable buffers,
/// which are reset at the start and end of every call.
pub trait VoxelMesher {
    /// Strategy implemented by this mesher.
    fn kind(&self) -> MesherKind;

    /// Meshes an already-locked grid or a snapshot. With `region`, only
    /// voxels inside it are meshed; placement still follows the whole grid.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::Grid`] if occupied cells lie outside the
    /// declared grid extents.
    fn mesh_store(
        &mut self,
        store: &VoxelStore,
        palette: &Palette,
        region: Option<BoundingBox>,
    ) -> MeshResult<Mesh>;

    /// Meshes the whole grid, holding its read lock for the full pass.
    ///
    /// # Errors
    ///
    /// See [`VoxelMesher::mesh_store`].
    fn generate_mesh(&mut self, grid: &VoxelGrid, palette: &Palette) -> MeshResult<Mesh> {
        let store = grid.read();
        self.mesh_store(&store, palette, None)
    }

    /// Meshes only the voxels inside `region`, e.g. a dirty chunk.
    ///
    /// # Errors
    ///
    /// See [`VoxelMesher::mesh_store`].
    fn generate_region(
        &mut self,
        grid: &VoxelGrid,
        palette: &Palette,
        region: BoundingBox,
    ) -> MeshResult<Mesh> {
        let store = grid.read();
        self.mesh_store(&store, palette, Some(region))
    }
}

/// The closed set of meshing strategies.
#[derive(Debug, Clone)]
pub enum Mesher {
    /// One quad per visible face.
    Simple(SimpleMesher),
    /// Rectangle-merging sweep.
    Greedy(GreedyMesher),
}

impl Mesher {
    /// Creates a mesher of the given kind with default settings.
    #[must_use]
    pub fn new(kind: MesherKind) -> Self {
        Self::from_config(&MeshConfig::with_mesher(kind))
    }

    /// Creates the mesher selected by `config.mesher`.
    #[must_use]
    pub fn from_config(config: &MeshConfig) -> Self {
        match config.mesher {
            MesherKind::Simple => Mesher::Simple(SimpleMesher::with_config(*config)),
            MesherKind::Greedy => Mesher::Greedy(GreedyMesher::with_config(*config)),
        }
    }
}

impl VoxelMesher for Mesher {
    fn kind(&self) -> MesherKind {
        match self {
            Mesher::Simple(m) => m.kind(),
            Mesher::Greedy(m) => m.kind(),
        }
    }

    fn mesh_store(
        &mut self,
        store: &VoxelStore,
        palette: &Palette,
        region: Option<BoundingBox>,
    ) -> MeshResult<Mesh> {
        match self {
            Mesher::Simple(m) => m.mesh_store(store, palette, region),
            Mesher::Greedy(m) => m.mesh_store(store, palette, region),
        }
    }
}

/// Maps integer cell edges to output coordinates.
///
/// Voxel `p` spans edges `p` and `p + 1` on each axis. When centring, the
/// bounding-box centre maps to the origin.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    origin: [f32; 3],
}

impl Frame {
    fn new(bbox: &BoundingBox, center: bool) -> Self {
        let origin = if center {
            bbox.center().map(|c| c + 0.5)
        } else {
            [0.0; 3]
        };
        Self { origin }
    }

    #[allow(clippy::cast_precision_loss)]
    fn edge(&self, axis: usize, edge: i32) -> f32 {
        edge as f32 - self.origin[axis]
    }

    /// Quad on the plane `plane` (an edge index along the face axis) covering
    /// edges `u.0..u.1` and `v.0..v.1` on the two other axes, in cyclic order.
    ///
    /// Positive faces are emitted counter-clockwise seen from outside,
    /// negative faces in reverse.
    pub(crate) fn face_quad(
        &self,
        face: Face,
        plane: i32,
        u: (i32, i32),
        v: (i32, i32),
        color: u32,
        material: u32,
    ) -> Quad {
        let axis = face.axis();
        let (a1, a2) = cyclic_axes(axis);
        let corner = |pu: i32, pv: i32| {
            let mut c = [0.0; 3];
            c[axis] = self.edge(axis, plane);
            c[a1] = self.edge(a1, pu);
            c[a2] = self.edge(a2, pv);
            c
        };

        let corners = if face.is_positive() {
            [corner(u.0, v.0), corner(u.1, v.0), corner(u.1, v.1), corner(u.0, v.1)]
        } else {
            [corner(u.0, v.0), corner(u.0, v.1), corner(u.1, v.1), corner(u.1, v.0)]
        };

        Quad {
            corners,
            normal: face.normal(),
            color,
            material,
        }
    }
}

/// The two axes spanning a face perpendicular to `axis`, in the cyclic
/// order that makes `a1 × a2` point along `+axis`.
#[inline]
pub(crate) const fn cyclic_axes(axis: usize) -> (usize, usize) {
    ((axis + 1) % 3, (axis + 2) % 3)
}

/// Validates the grid and picks the cells to mesh.
///
/// Returns `None` when there is nothing to mesh.
pub(crate) fn plan(
    store: &VoxelStore,
    region: Option<BoundingBox>,
    config: &MeshConfig,
) -> MeshResult<Option<(BoundingBox, Frame)>> {
    let Some(bbox) = store.bbox() else {
        return Ok(None);
    };
    store.check_bounds(bbox.min)?;
    store.check_bounds(bbox.max)?;

    let target = match region {
        None => Some(bbox),
        Some(region) => region.intersect(&bbox),
    };
    Ok(target.map(|t| (t, Frame::new(&bbox, config.center_on_bbox))))
}

/// Moves the mesh out of `builder` and logs the pass.
pub(crate) fn finish(
    kind: MesherKind,
    builder: &mut MeshBuilder,
    started: Instant,
    config: &MeshConfig,
) -> Mesh {
    let mesh = builder.take_mesh();
    let elapsed_ms = started.elapsed().as_millis();

    tracing::debug!(
        mesher = %kind,
        quads = mesh.quad_count(),
        vertices = mesh.vertices.len(),
        elapsed_ms = elapsed_ms as u64,
        "mesh generated"
    );
    if elapsed_ms > u128::from(config.slow_mesh_warn_ms) {
        tracing::warn!(
            "slow {} mesh generation: {}ms for {} quads",
            kind,
            elapsed_ms,
            mesh.quad_count()
        );
    }
    mesh
}
