//! Attribute interning shared by every mesher.
//!
//! Positions, normals and UVs are deduplicated by the exact bit pattern of
//! their components. This is canonicalisation, not welding: values that
//! differ in any bit (including `0.0` vs `-0.0`) stay distinct.

use std::collections::{BTreeMap, HashMap};

use crate::error::{checked_index, MeshResult};
use crate::mesh::{dot, triangle_normal, FaceGroup, FaceIndex, Mesh};
use crate::palette::Palette;

/// One quad handed to the builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corners in perimeter order (either winding).
    pub corners: [[f32; 3]; 4],
    /// Outward normal the triangles must face.
    pub normal: [f32; 3],
    /// Palette colour index.
    pub color: u32,
    /// Material index selecting the face group.
    pub material: u32,
}

/// Append-only table returning a stable index per distinct value.
#[derive(Debug, Clone, Default)]
struct Interner<const N: usize> {
    values: Vec<[f32; N]>,
    lookup: HashMap<[u32; N], u32>,
}

impl<const N: usize> Interner<N> {
    fn intern(&mut self, value: [f32; N], table: &'static str) -> MeshResult<u32> {
        let key = value.map(f32::to_bits);
        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }
        let index = checked_index(self.values.len(), table)?;
        self.values.push(value);
        self.lookup.insert(key, index);
        Ok(index)
    }

    fn clear(&mut self) {
        self.values.clear();
        self.lookup.clear();
    }

    fn take(&mut self) -> Vec<[f32; N]> {
        self.lookup.clear();
        std::mem::take(&mut self.values)
    }
}

/// Accumulates deduplicated attributes and per-material triangles for one
/// mesh generation call.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    vertices: Interner<3>,
    normals: Interner<3>,
    uvs: Interner<2>,
    groups: BTreeMap<u32, Vec<FaceIndex>>,
    quads: usize,
}

impl MeshBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::IndexOverflow`] once the table is full.
    pub fn add_vertex(&mut self, position: [f32; 3]) -> MeshResult<u32> {
        self.vertices.intern(position, "vertex")
    }

    /// Interns a normal.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::IndexOverflow`] once the table is full.
    pub fn add_normal(&mut self, normal: [f32; 3]) -> MeshResult<u32> {
        self.normals.intern(normal, "normal")
    }

    /// Interns a UV.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::IndexOverflow`] once the table is full.
    pub fn add_uv(&mut self, uv: [f32; 2]) -> MeshResult<u32> {
        self.uvs.intern(uv, "uv")
    }

    /// Interns a quad and appends its two triangles to the material's group.
    ///
    /// The winding is flipped when needed so the geometric normal of each
    /// triangle points along `quad.normal`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::IndexOverflow`] if an attribute table is
    /// full; the builder is left without the quad's triangles.
    pub fn add_face(&mut self, quad: &Quad, palette: &Palette) -> MeshResult<()> {
        let [c0, c1, c2, c3] = quad.corners;
        let order = if dot(triangle_normal(c0, c1, c2), quad.normal) < 0.0 {
            [0, 2, 1, 0, 3, 2]
        } else {
            [0, 1, 2, 0, 2, 3]
        };

        let mut corners = [0; 4];
        for (slot, &corner) in corners.iter_mut().zip(&quad.corners) {
            *slot = self.add_vertex(corner)?;
        }
        let normal = self.add_normal(quad.normal)?;
        let uv = self.add_uv(palette.uv(quad.color))?;

        let group = self.groups.entry(quad.material).or_default();
        group.extend(order.iter().map(|&i| FaceIndex {
            vertex: corners[i],
            normal,
            uv,
        }));
        self.quads += 1;
        Ok(())
    }

    /// Quads added since the last reset.
    #[inline]
    #[must_use]
    pub const fn quad_count(&self) -> usize {
        self.quads
    }

    /// Unique positions interned so far.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.values.len()
    }

    /// Drops all state, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.uvs.clear();
        self.groups.clear();
        self.quads = 0;
    }

    /// Moves the accumulated data out as a [`Mesh`] and resets the builder.
    pub fn take_mesh(&mut self) -> Mesh {
        let groups = std::mem::take(&mut self.groups)
            .into_iter()
            .map(|(material, indices)| FaceGroup { material, indices })
            .collect();
        let mesh = Mesh {
            vertices: self.vertices.take(),
            normals: self.normals.take(),
            uvs: self.uvs.take(),
            groups,
            quad_count: self.quads,
        };
        self.quads = 0;
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(corners: [[f32; 3]; 4], normal: [f32; 3]) -> Quad {
        Quad {
            corners,
            normal,
            color: 0,
            material: 1,
        }
    }

    const SQUARE: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];

    #[test]
    fn test_interning_idempotent() {
        let mut builder = MeshBuilder::new();
        let a = builder.add_vertex([0.5, -0.5, 0.5]).unwrap();
        let b = builder.add_vertex([0.5, -0.5, 0.5]).unwrap();
        let c = builder.add_vertex([0.5, 0.5, 0.5]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(builder.vertex_count(), 2);
    }

    #[test]
    fn test_signed_zero_kept_distinct() {
        let mut builder = MeshBuilder::new();
        let pos = builder.add_normal([0.0, 1.0, 0.0]).unwrap();
        let neg = builder.add_normal([-0.0, 1.0, 0.0]).unwrap();
        assert_ne!(pos, neg);
    }

    #[test]
    fn test_winding_matches_normal() {
        for normal in [[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]] {
            let mut builder = MeshBuilder::new();
            builder.add_face(&quad(SQUARE, normal), &Palette::new()).unwrap();
            let mesh = builder.take_mesh();

            for tri in mesh.groups[0].triangles() {
                let [a, b, c] = tri.map(|i| mesh.position(i));
                assert!(dot(triangle_normal(a, b, c), normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_take_mesh_resets() {
        let mut builder = MeshBuilder::new();
        builder.add_face(&quad(SQUARE, [0.0, 0.0, 1.0]), &Palette::new()).unwrap();
        let first = builder.take_mesh();
        assert_eq!(first.quad_count(), 1);
        assert_eq!(first.vertices.len(), 4);
        assert_eq!(first.triangle_count(), 2);

        assert_eq!(builder.quad_count(), 0);
        assert_eq!(builder.vertex_count(), 0);
        let second = builder.take_mesh();
        assert!(second.is_empty());
        assert!(second.vertices.is_empty());

        // Indices restart from zero after a reset.
        assert_eq!(builder.add_vertex([9.0, 9.0, 9.0]), Ok(0));
    }

    #[test]
    fn test_groups_sorted_by_material() {
        let mut builder = MeshBuilder::new();
        let palette = Palette::new();
        for material in [4, 0, 2] {
            builder.add_face(
                &Quad {
                    material,
                    ..quad(SQUARE, [0.0, 0.0, 1.0])
                },
                &palette,
            )
            .unwrap();
        }
        let mesh = builder.take_mesh();
        let materials: Vec<_> = mesh.groups.iter().map(|g| g.material).collect();
        assert_eq!(materials, vec![0, 2, 4]);
        // Corners are shared across groups.
        assert_eq!(mesh.vertices.len(), 4);
    }
}
