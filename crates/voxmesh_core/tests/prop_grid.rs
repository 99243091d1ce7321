use proptest::prelude::*;
use voxmesh_core::{BoundingBox, Face, GridPos, VoxelGrid};

const SIZE: i32 = 6;

#[derive(Debug, Clone)]
enum Edit {
    Set {
        pos: GridPos,
        material: u32,
        color: u32,
        transparent: bool,
    },
    Remove(GridPos),
}

fn arb_pos() -> impl Strategy<Value = GridPos> {
    (0..SIZE, 0..SIZE, 0..SIZE).prop_map(|(x, y, z)| GridPos::new(x, y, z))
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (arb_pos(), 0u32..3, 0u32..3, any::<bool>()).prop_map(
            |(pos, material, color, transparent)| Edit::Set {
                pos,
                material,
                color,
                transparent,
            }
        ),
        1 => arb_pos().prop_map(Edit::Remove),
    ]
}

fn apply(grid: &VoxelGrid, edits: &[Edit]) {
    for edit in edits {
        match *edit {
            Edit::Set {
                pos,
                material,
                color,
                transparent,
            } => grid.set_voxel(pos, material, color, transparent).unwrap(),
            Edit::Remove(pos) => {
                grid.remove_voxel(pos);
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_visibility_symmetric(edits in prop::collection::vec(arb_edit(), 0..120)) {
        let grid = VoxelGrid::with_size([SIZE; 3]).unwrap();
        apply(&grid, &edits);

        let store = grid.read();
        for voxel in store.voxels() {
            for face in Face::ALL {
                match store.get(voxel.pos.neighbor(face)) {
                    Some(nbr) => prop_assert_eq!(
                        voxel.is_face_visible(face),
                        nbr.is_face_visible(face.opposite())
                    ),
                    None => prop_assert!(voxel.is_face_visible(face)),
                }
            }
        }
    }

    #[test]
    fn prop_opaque_pairs_hidden(edits in prop::collection::vec(arb_edit(), 0..120)) {
        let grid = VoxelGrid::with_size([SIZE; 3]).unwrap();
        apply(&grid, &edits);

        let store = grid.read();
        for voxel in store.voxels().filter(|v| !v.transparent) {
            for face in Face::ALL {
                if store.get_matching(voxel.pos.neighbor(face), false).is_some() {
                    prop_assert_eq!(voxel.normal(face), [0.0; 3]);
                }
            }
        }
    }

    #[test]
    fn prop_bbox_matches_occupancy(edits in prop::collection::vec(arb_edit(), 0..120)) {
        let grid = VoxelGrid::with_size([SIZE; 3]).unwrap();
        apply(&grid, &edits);

        let expected = BoundingBox::enclosing(grid.voxels().into_iter().map(|v| v.pos));
        prop_assert_eq!(grid.bbox(), expected);
    }

    #[test]
    fn prop_keys_match_positions(edits in prop::collection::vec(arb_edit(), 0..120)) {
        let grid = VoxelGrid::with_size([SIZE; 3]).unwrap();
        apply(&grid, &edits);
        let dumped = grid.voxels().len();

        let store = grid.read();
        for voxel in store.voxels() {
            prop_assert_eq!(store.get(voxel.pos).map(|v| v.pos), Some(voxel.pos));
        }
        prop_assert_eq!(store.len(), dumped);
    }
}
