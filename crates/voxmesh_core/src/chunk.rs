//! Chunk partitioning for incremental remeshing.
//!
//! Chunks are 16x16x16 cells. They hold no voxels themselves, only summaries
//! that let an editor limit remeshing to the regions that changed.

use std::collections::HashMap;

use crate::coords::{BoundingBox, GridPos};
use crate::voxel::Voxel;

/// Chunk dimension - 16 cells per axis.
pub const CHUNK_SIZE: i32 = 16;

/// Identifies a chunk, or the single chunk spanning the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkId {
    /// Aggregate over the whole grid.
    Global,
    /// Regular chunk, keyed by its minimum corner.
    Region(GridPos),
}

impl ChunkId {
    /// Returns the chunk containing `pos`.
    #[inline]
    #[must_use]
    pub fn containing(pos: GridPos) -> Self {
        Self::Region(chunk_origin(pos))
    }

    /// Cell region this chunk covers, `None` for the global chunk.
    #[must_use]
    pub fn region(self) -> Option<BoundingBox> {
        match self {
            ChunkId::Global => None,
            ChunkId::Region(origin) => Some(BoundingBox {
                min: origin,
                max: origin + GridPos::new(CHUNK_SIZE - 1, CHUNK_SIZE - 1, CHUNK_SIZE - 1),
            }),
        }
    }
}

/// Minimum corner of the chunk containing `pos` (floor division, re-scaled).
#[inline]
#[must_use]
pub const fn chunk_origin(pos: GridPos) -> GridPos {
    GridPos::new(
        pos.x.div_euclid(CHUNK_SIZE) * CHUNK_SIZE,
        pos.y.div_euclid(CHUNK_SIZE) * CHUNK_SIZE,
        pos.z.div_euclid(CHUNK_SIZE) * CHUNK_SIZE,
    )
}

/// Colour/material pair of a transparent voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceKey {
    /// Colour index.
    pub color: u32,
    /// Material index.
    pub material: u32,
}

/// Per-chunk occupancy summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    id: ChunkId,
    bbox: Option<BoundingBox>,
    transparent: HashMap<SurfaceKey, BoundingBox>,
}

impl Chunk {
    /// Creates an empty chunk.
    #[must_use]
    pub fn new(id: ChunkId) -> Self {
        Self {
            id,
            bbox: None,
            transparent: HashMap::new(),
        }
    }

    /// The chunk identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ChunkId {
        self.id
    }

    /// Cell region this chunk covers, `None` for the global chunk.
    #[must_use]
    pub fn region(&self) -> Option<BoundingBox> {
        self.id.region()
    }

    /// Bounding box of the voxels recorded in this chunk.
    #[inline]
    #[must_use]
    pub const fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Bounding box of transparent voxels with the given colour and material.
    #[must_use]
    pub fn transparent_bbox(&self, color: u32, material: u32) -> Option<BoundingBox> {
        self.transparent.get(&SurfaceKey { color, material }).copied()
    }

    /// All transparent colour/material pairs seen, sorted.
    #[must_use]
    pub fn transparent_keys(&self) -> Vec<SurfaceKey> {
        let mut keys: Vec<_> = self.transparent.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Extends the summaries with `voxel`.
    pub fn record(&mut self, voxel: &Voxel) {
        match &mut self.bbox {
            Some(bbox) => bbox.include(voxel.pos),
            None => self.bbox = Some(BoundingBox::point(voxel.pos)),
        }
        if voxel.transparent {
            self.record_transparent(voxel);
        }
    }

    /// Extends only the transparent summaries with `voxel`.
    pub(crate) fn record_transparent(&mut self, voxel: &Voxel) {
        let key = SurfaceKey {
            color: voxel.color,
            material: voxel.material,
        };
        self.transparent
            .entry(key)
            .and_modify(|bbox| bbox.include(voxel.pos))
            .or_insert_with(|| BoundingBox::point(voxel.pos));
    }

    /// Extends the summaries with everything recorded in `other`.
    pub(crate) fn merge(&mut self, other: &Chunk) {
        if let Some(b) = other.bbox {
            match &mut self.bbox {
                Some(bbox) => {
                    bbox.include(b.min);
                    bbox.include(b.max);
                }
                None => self.bbox = Some(b),
            }
        }
        for (key, b) in &other.transparent {
            self.transparent
                .entry(*key)
                .and_modify(|bbox| {
                    bbox.include(b.min);
                    bbox.include(b.max);
                })
                .or_insert(*b);
        }
    }

    /// Drops all summaries.
    pub(crate) fn reset(&mut self) {
        self.bbox = None;
        self.transparent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_origin_floor_division() {
        assert_eq!(chunk_origin(GridPos::new(0, 15, 16)), GridPos::new(0, 0, 16));
        assert_eq!(chunk_origin(GridPos::new(-1, -16, -17)), GridPos::new(-16, -16, -32));
    }

    #[test]
    fn test_chunk_region() {
        let chunk = Chunk::new(ChunkId::containing(GridPos::new(20, 3, 40)));
        let region = chunk.region().unwrap();
        assert_eq!(region.min, GridPos::new(16, 0, 32));
        assert_eq!(region.max, GridPos::new(31, 15, 47));
        assert!(Chunk::new(ChunkId::Global).region().is_none());
    }

    #[test]
    fn test_record_transparent_boxes() {
        let mut chunk = Chunk::new(ChunkId::Global);
        chunk.record(&Voxel::new(GridPos::new(1, 1, 1), 2, 5, true));
        chunk.record(&Voxel::new(GridPos::new(4, 0, 2), 2, 5, true));
        chunk.record(&Voxel::new(GridPos::new(9, 9, 9), 2, 5, false));

        let bbox = chunk.transparent_bbox(5, 2).unwrap();
        assert_eq!(bbox.min, GridPos::new(1, 0, 1));
        assert_eq!(bbox.max, GridPos::new(4, 1, 2));
        assert!(chunk.transparent_bbox(5, 3).is_none());
        assert_eq!(chunk.bbox().unwrap().max, GridPos::new(9, 9, 9));
        assert_eq!(chunk.transparent_keys().len(), 1);
    }

    #[test]
    fn test_merge_unions_boxes() {
        let mut a = Chunk::new(ChunkId::containing(GridPos::ZERO));
        a.record(&Voxel::new(GridPos::new(1, 2, 3), 0, 1, true));
        let mut b = Chunk::new(ChunkId::containing(GridPos::new(20, 0, 0)));
        b.record(&Voxel::new(GridPos::new(20, 0, 5), 0, 1, true));
        b.record(&Voxel::new(GridPos::new(21, 1, 1), 4, 4, false));

        let mut global = Chunk::new(ChunkId::Global);
        global.merge(&a);
        global.merge(&b);
        global.merge(&Chunk::new(ChunkId::Global));

        let expected = BoundingBox::from_corners(GridPos::new(1, 0, 1), GridPos::new(21, 2, 5));
        assert_eq!(global.bbox(), Some(expected));
        let glass = global.transparent_bbox(1, 0).unwrap();
        assert_eq!(glass.min, GridPos::new(1, 0, 3));
        assert_eq!(glass.max, GridPos::new(20, 2, 5));
        assert!(global.transparent_bbox(4, 4).is_none());
    }
}
