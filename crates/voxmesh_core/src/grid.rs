//! Sparse voxel grid.
//!
//! Voxels live in a hash map keyed by position. Every mutation refreshes face
//! visibility for the touched cell and its six neighbours, updates the chunk
//! summaries and marks the owning chunk for remeshing.
//!
//! The whole state sits behind a single `RwLock`. A mutation holds the write
//! guard for its full duration, so neighbour updates and chunk bookkeeping are
//! observed atomically by readers. Every read takes the lock recursively, so
//! a thread holding [`VoxelGrid::read`] may call other accessors even while a
//! writer is queued.

use std::collections::{BTreeSet, HashMap};

use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};

use crate::chunk::{chunk_origin, Chunk, ChunkId, CHUNK_SIZE};
use crate::coords::{BoundingBox, GridPos};
use crate::error::{GridError, GridResult};
use crate::visibility;
use crate::voxel::Voxel;

/// Grid behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Mark the global chunk dirty on every mutation instead of the owning chunk.
    pub remesh_all: bool,
}

/// Grid state guarded by [`VoxelGrid`].
///
/// Read access is public so meshers can walk a locked grid or an owned
/// snapshot through the same API.
#[derive(Debug, Clone)]
pub struct VoxelStore {
    size: GridPos,
    voxels: HashMap<GridPos, Voxel>,
    chunks: HashMap<GridPos, Chunk>,
    global: Chunk,
    dirty: BTreeSet<ChunkId>,
    config: GridConfig,
}

impl VoxelStore {
    fn new(config: GridConfig) -> Self {
        Self {
            size: GridPos::ZERO,
            voxels: HashMap::new(),
            chunks: HashMap::new(),
            global: Chunk::new(ChunkId::Global),
            dirty: BTreeSet::new(),
            config,
        }
    }

    /// Declared extents. The grid always starts at the origin.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> GridPos {
        self.size
    }

    /// Returns true if `pos` lies inside `[0, size)` on every axis.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        (0..3).all(|a| pos.axis(a) >= 0 && pos.axis(a) < self.size.axis(a))
    }

    /// Fails with [`GridError::IndexOutOfRange`] if `pos` is outside the grid.
    ///
    /// # Errors
    ///
    /// Returns error if `pos` is not addressable.
    pub fn check_bounds(&self, pos: GridPos) -> GridResult<()> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(GridError::IndexOutOfRange {
                pos,
                size: self.size,
            })
        }
    }

    /// The voxel at `pos`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<&Voxel> {
        self.voxels.get(&pos)
    }

    /// The voxel at `pos` only if its transparency equals `transparent`.
    #[inline]
    #[must_use]
    pub fn get_matching(&self, pos: GridPos, transparent: bool) -> Option<&Voxel> {
        self.get(pos).filter(|v| v.transparent == transparent)
    }

    /// Returns true if a voxel occupies `pos`.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.voxels.contains_key(&pos)
    }

    /// Iterates every voxel in arbitrary order.
    pub fn voxels(&self) -> impl Iterator<Item = &Voxel> + '_ {
        self.voxels.values()
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Returns true if no cell is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Minimal box containing every occupied cell.
    #[inline]
    #[must_use]
    pub const fn bbox(&self) -> Option<BoundingBox> {
        self.global.bbox()
    }

    /// Chunk whose minimum corner is `origin`, if created.
    #[must_use]
    pub fn chunk(&self, origin: GridPos) -> Option<&Chunk> {
        self.chunks.get(&origin)
    }

    /// The chunk aggregating the whole grid.
    #[inline]
    #[must_use]
    pub const fn global_chunk(&self) -> &Chunk {
        &self.global
    }

    /// Number of regular chunks created so far.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn set_size(&mut self, extents: [i32; 3]) -> GridResult<()> {
        if let Some((axis, &value)) = extents.iter().enumerate().find(|(_, v)| **v < 0) {
            return Err(GridError::InvalidDimension { axis, value });
        }
        self.size = GridPos::from(extents);
        self.voxels.clear();
        self.chunks.clear();
        self.global.reset();
        self.dirty.clear();
        self.dirty.insert(ChunkId::Global);
        tracing::trace!("grid resized to {}", self.size);
        Ok(())
    }

    fn set_voxel(&mut self, voxel: Voxel) -> GridResult<()> {
        self.check_bounds(voxel.pos)?;
        let pos = voxel.pos;
        let previous = self.voxels.insert(pos, voxel);
        visibility::refresh_faces(&mut self.voxels, pos);

        let origin = chunk_origin(pos);
        let chunk = self.chunks.entry(origin).or_insert_with(|| {
            tracing::trace!("chunk created at {}", origin);
            Chunk::new(ChunkId::Region(origin))
        });

        if previous.is_some_and(|old| old.transparent) {
            // The old colour/material box may no longer be backed by any voxel.
            self.rebuild_chunk(origin);
            self.rebuild_global();
        } else {
            chunk.record(&voxel);
            self.global.record(&voxel);
        }

        self.mark_dirty(pos);
        Ok(())
    }

    fn remove_voxel(&mut self, pos: GridPos) -> Option<Voxel> {
        let removed = self.voxels.remove(&pos)?;
        visibility::expose_neighbors(&mut self.voxels, pos);

        self.rebuild_chunk(chunk_origin(pos));
        let on_boundary = self.global.bbox().is_some_and(|b| b.touches_boundary(pos));
        if removed.transparent || on_boundary {
            self.rebuild_global();
        }

        self.mark_dirty(pos);
        Some(removed)
    }

    fn rebuild_chunk(&mut self, origin: GridPos) {
        let Some(chunk) = self.chunks.get_mut(&origin) else {
            return;
        };
        chunk.reset();
        // Inclusive bounds: the last chunk may end at i32::MAX.
        let last = CHUNK_SIZE - 1;
        for z in origin.z..=origin.z + last {
            for y in origin.y..=origin.y + last {
                for x in origin.x..=origin.x + last {
                    if let Some(voxel) = self.voxels.get(&GridPos::new(x, y, z)) {
                        chunk.record(voxel);
                    }
                }
            }
        }
    }

    /// Recomputes the global summary from the chunk summaries. Owning
    /// chunks must already be up to date.
    fn rebuild_global(&mut self) {
        self.global.reset();
        for chunk in self.chunks.values() {
            self.global.merge(chunk);
        }
    }

    fn mark_dirty(&mut self, pos: GridPos) {
        let id = if self.config.remesh_all {
            ChunkId::Global
        } else {
            ChunkId::containing(pos)
        };
        self.dirty.insert(id);
    }
}

/// Thread-safe sparse voxel grid.
///
/// Safe for concurrent queries from a meshing thread while an editor
/// mutates voxels. Meshers that must see a stable grid for the whole pass
/// should hold [`VoxelGrid::read`] or work on a [`VoxelGrid::snapshot`].
#[derive(Debug)]
pub struct VoxelGrid {
    state: RwLock<VoxelStore>,
}

impl VoxelGrid {
    /// Creates an empty grid of size zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    /// Creates an empty grid with the given behaviour switches.
    #[must_use]
    pub fn with_config(config: GridConfig) -> Self {
        Self {
            state: RwLock::new(VoxelStore::new(config)),
        }
    }

    /// Creates an empty grid with the given extents.
    ///
    /// # Errors
    ///
    /// Returns error if any extent is negative.
    pub fn with_size(extents: [i32; 3]) -> GridResult<Self> {
        let grid = Self::new();
        grid.set_size(extents)?;
        Ok(grid)
    }

    /// Reallocates the addressable space and clears all content.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimension`] if any extent is negative;
    /// the grid is left untouched.
    pub fn set_size(&self, extents: [i32; 3]) -> GridResult<()> {
        self.state.write().set_size(extents)
    }

    /// Declared extents.
    #[must_use]
    pub fn size(&self) -> GridPos {
        self.state.read_recursive().size()
    }

    /// Inserts or overwrites the voxel at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOutOfRange`] if `pos` is outside the grid.
    pub fn set_voxel(
        &self,
        pos: GridPos,
        material: u32,
        color: u32,
        transparent: bool,
    ) -> GridResult<()> {
        self.state
            .write()
            .set_voxel(Voxel::new(pos, material, color, transparent))
    }

    /// Removes the voxel at `pos`, returning it. No-op if the cell is empty.
    pub fn remove_voxel(&self, pos: GridPos) -> Option<Voxel> {
        self.state.write().remove_voxel(pos)
    }

    /// The voxel at `pos`, if any.
    #[must_use]
    pub fn get_voxel(&self, pos: GridPos) -> Option<Voxel> {
        self.state.read_recursive().get(pos).copied()
    }

    /// The voxel at `pos` only if its transparency equals `transparent`.
    #[must_use]
    pub fn get_voxel_matching(&self, pos: GridPos, transparent: bool) -> Option<Voxel> {
        self.state.read_recursive().get_matching(pos, transparent).copied()
    }

    /// Copies out every voxel in arbitrary order.
    #[must_use]
    pub fn voxels(&self) -> Vec<Voxel> {
        self.state.read_recursive().voxels().copied().collect()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.state.read_recursive().len()
    }

    /// Minimal box containing every occupied cell.
    #[must_use]
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.state.read_recursive().bbox()
    }

    /// Chunk whose minimum corner is `origin`, if created.
    #[must_use]
    pub fn chunk(&self, origin: GridPos) -> Option<Chunk> {
        self.state.read_recursive().chunk(origin).cloned()
    }

    /// The chunk aggregating the whole grid.
    #[must_use]
    pub fn global_chunk(&self) -> Chunk {
        self.state.read_recursive().global_chunk().clone()
    }

    /// Number of regular chunks created so far.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.state.read_recursive().chunk_count()
    }

    /// Returns and clears the chunks marked for remeshing, in sorted order.
    ///
    /// Call this from the remeshing pass.
    pub fn take_dirty_chunks(&self) -> Vec<ChunkId> {
        std::mem::take(&mut self.state.write().dirty)
            .into_iter()
            .collect()
    }

    /// Locks the grid for reading. Mutations block until the guard drops.
    ///
    /// Other read accessors stay usable on the same thread while the guard
    /// is held.
    pub fn read(&self) -> RwLockReadGuard<'_, VoxelStore> {
        self.state.read_recursive()
    }

    /// Clones the current state so meshing can run while the grid changes.
    #[must_use]
    pub fn snapshot(&self) -> VoxelStore {
        self.state.read_recursive().clone()
    }
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}
