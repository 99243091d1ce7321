//! Mesh output.
//!
//! A [`Mesh`] keeps separate, deduplicated position/normal/UV arrays and
//! per-material face groups of index triples, the layout OBJ-style exporters
//! want. [`Mesh::to_indexed_buffers`] flattens it for GPU upload.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::error::{checked_index, MeshResult};

/// Indices of one triangle corner into the mesh attribute arrays (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceIndex {
    /// Index into [`Mesh::vertices`].
    pub vertex: u32,
    /// Index into [`Mesh::normals`].
    pub normal: u32,
    /// Index into [`Mesh::uvs`].
    pub uv: u32,
}

/// Triangles sharing one material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceGroup {
    /// Material index from the voxels.
    pub material: u32,
    /// Three corners per triangle.
    pub indices: Vec<FaceIndex>,
}

impl FaceGroup {
    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates the triangles as corner triples.
    pub fn triangles(&self) -> impl Iterator<Item = [FaceIndex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Vertex for flat buffers - packed for GPU efficiency.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position [x, y, z]
    pub position: [f32; 3],
    /// Normal direction [nx, ny, nz]
    pub normal: [f32; 3],
    /// Palette UV [u, v]
    pub uv: [f32; 2],
    /// Material index
    pub material: u32,
}

/// Finished mesh of a voxel grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Unique positions.
    pub vertices: Vec<[f32; 3]>,
    /// Unique normals.
    pub normals: Vec<[f32; 3]>,
    /// Unique UVs.
    pub uvs: Vec<[f32; 2]>,
    /// Face groups, sorted by material index.
    pub groups: Vec<FaceGroup>,
    pub(crate) quad_count: usize,
}

impl Mesh {
    /// Returns true if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.indices.is_empty())
    }

    /// Number of quads submitted while building.
    #[inline]
    #[must_use]
    pub const fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// Total triangles across all groups.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(FaceGroup::triangle_count).sum()
    }

    /// Face group for `material`, if any triangle uses it.
    #[must_use]
    pub fn group(&self, material: u32) -> Option<&FaceGroup> {
        self.groups.iter().find(|g| g.material == material)
    }

    /// Position of a triangle corner.
    #[inline]
    #[must_use]
    pub fn position(&self, index: FaceIndex) -> [f32; 3] {
        self.vertices[index.vertex as usize]
    }

    /// Sum of triangle areas.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.groups
            .iter()
            .flat_map(FaceGroup::triangles)
            .map(|[a, b, c]| {
                let n = triangle_normal(self.position(a), self.position(b), self.position(c));
                0.5 * f64::from(dot(n, n)).sqrt()
            })
            .sum()
    }

    /// Flattens the mesh into one vertex per unique (position, normal, UV,
    /// material) corner plus a `u32` triangle index buffer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::IndexOverflow`] if the flat vertex count
    /// does not fit in a `u32` index.
    pub fn to_indexed_buffers(&self) -> MeshResult<(Vec<MeshVertex>, Vec<u32>)> {
        let mut lookup: HashMap<(FaceIndex, u32), u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(self.triangle_count() * 3);

        for group in &self.groups {
            for &corner in &group.indices {
                let key = (corner, group.material);
                let index = match lookup.get(&key) {
                    Some(&index) => index,
                    None => {
                        let index = checked_index(vertices.len(), "flat vertex")?;
                        vertices.push(MeshVertex {
                            position: self.vertices[corner.vertex as usize],
                            normal: self.normals[corner.normal as usize],
                            uv: self.uvs[corner.uv as usize],
                            material: group.material,
                        });
                        lookup.insert(key, index);
                        index
                    }
                };
                indices.push(index);
            }
        }

        Ok((vertices, indices))
    }
}

/// Unnormalised geometric normal of triangle `abc`.
#[inline]
#[must_use]
pub fn triangle_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    cross(sub(b, a), sub(c, a))
}

#[inline]
pub(crate) fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub(crate) fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub(crate) fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Mesh {
        let corner = |vertex| FaceIndex {
            vertex,
            normal: 0,
            uv: 0,
        };
        Mesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]],
            uvs: vec![[0.5, 0.5]],
            groups: vec![FaceGroup {
                material: 3,
                indices: [0, 1, 2, 0, 2, 3].map(corner).to_vec(),
            }],
            quad_count: 1,
        }
    }

    #[test]
    fn test_counts_and_area() {
        let mesh = unit_square();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.quad_count(), 1);
        assert!((mesh.surface_area() - 1.0).abs() < 1e-9);
        assert!(mesh.group(3).is_some());
        assert!(mesh.group(0).is_none());
        assert!(!mesh.is_empty());
        assert!(Mesh::default().is_empty());
    }

    #[test]
    fn test_indexed_buffers_share_corners() {
        let (vertices, indices) = unit_square().to_indexed_buffers().unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[0].material, 3);
        assert_eq!(bytemuck::cast_slice::<MeshVertex, u8>(&vertices).len(), 4 * 36);
    }

    #[test]
    fn test_triangle_normal_ccw() {
        let n = triangle_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }
}
