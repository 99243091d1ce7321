//! Voxel records stored by the grid.

use crate::coords::{Face, GridPos};

/// One occupied grid cell.
///
/// Face visibility is packed into one bit per [`Face`] slot. A hidden face
/// reports the zero vector as its normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Voxel {
    /// Position in the grid. Always equals the key it is stored under.
    pub pos: GridPos,
    /// Index into the external material table (0 = default).
    pub material: u32,
    /// Index into the external colour palette.
    pub color: u32,
    /// True if light passes through this voxel.
    pub transparent: bool,
    /// Bit `face.index()` set when that face is exposed.
    visible_faces: u8,
}

impl Voxel {
    const ALL_FACES: u8 = 0b11_1111;

    /// Creates a voxel with every face exposed.
    #[inline]
    #[must_use]
    pub const fn new(pos: GridPos, material: u32, color: u32, transparent: bool) -> Self {
        Self {
            pos,
            material,
            color,
            transparent,
            visible_faces: Self::ALL_FACES,
        }
    }

    /// Returns true if `face` is exposed.
    #[inline]
    #[must_use]
    pub const fn is_face_visible(&self, face: Face) -> bool {
        self.visible_faces & (1 << face as u8) != 0
    }

    /// Sets the exposure of `face`.
    #[inline]
    pub fn set_face_visible(&mut self, face: Face, visible: bool) {
        if visible {
            self.visible_faces |= 1 << face.index();
        } else {
            self.visible_faces &= !(1 << face.index());
        }
    }

    /// Normal of `face`: the unit outward normal if exposed, else zero.
    #[inline]
    #[must_use]
    pub fn normal(&self, face: Face) -> [f32; 3] {
        if self.is_face_visible(face) {
            face.normal()
        } else {
            [0.0; 3]
        }
    }

    /// All six normals in [`Face::ALL`] order.
    #[must_use]
    pub fn normals(&self) -> [[f32; 3]; 6] {
        Face::ALL.map(|face| self.normal(face))
    }

    /// A voxel is visible iff at least one face is exposed.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible_faces != 0
    }

    /// Number of exposed faces.
    #[inline]
    #[must_use]
    pub const fn visible_face_count(&self) -> u32 {
        self.visible_faces.count_ones()
    }

    /// Iterates the exposed faces in slot order.
    pub fn visible_faces(&self) -> impl Iterator<Item = Face> + '_ {
        Face::ALL.into_iter().filter(|&f| self.is_face_visible(f))
    }
}
