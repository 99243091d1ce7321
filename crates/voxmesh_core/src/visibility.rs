//! Face culling rules between neighbouring voxels.
//!
//! A shared face is decided once per pair and written to both voxels:
//!
//! | cur         | nbr         | material | color | shared face |
//! |-------------|-------------|----------|-------|-------------|
//! | opaque      | opaque      | -        | -     | hidden      |
//! | opaque      | transparent | -        | -     | visible     |
//! | transparent | opaque      | -        | -     | visible     |
//! | transparent | transparent | differ   | -     | visible     |
//! | transparent | transparent | same     | differ| visible     |
//! | transparent | transparent | same     | same  | hidden      |
//!
//! A face with no neighbour is always exposed.

use std::collections::HashMap;

use crate::coords::{Face, GridPos};
use crate::voxel::Voxel;

/// Returns true if the face shared by two adjacent voxels must be drawn.
#[must_use]
pub fn shared_face_visible(cur: &Voxel, nbr: &Voxel) -> bool {
    match (cur.transparent, nbr.transparent) {
        (false, false) => false,
        (true, false) | (false, true) => true,
        (true, true) => cur.material != nbr.material || cur.color != nbr.color,
    }
}

/// Recomputes all six faces of the voxel at `pos` and the opposing faces of
/// its neighbours. Does nothing if `pos` is empty.
pub fn refresh_faces(voxels: &mut HashMap<GridPos, Voxel>, pos: GridPos) {
    let Some(mut cur) = voxels.get(&pos).copied() else {
        return;
    };

    for face in Face::ALL {
        match voxels.get_mut(&pos.neighbor(face)) {
            None => cur.set_face_visible(face, true),
            Some(nbr) => {
                let visible = shared_face_visible(&cur, nbr);
                cur.set_face_visible(face, visible);
                nbr.set_face_visible(face.opposite(), visible);
            }
        }
    }

    voxels.insert(pos, cur);
}

/// Exposes the faces of every neighbour that pointed at a now-empty `pos`.
pub fn expose_neighbors(voxels: &mut HashMap<GridPos, Voxel>, pos: GridPos) {
    for face in Face::ALL {
        if let Some(nbr) = voxels.get_mut(&pos.neighbor(face)) {
            nbr.set_face_visible(face.opposite(), true);
        }
    }
}
