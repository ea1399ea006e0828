//! Chunked cell storage
//!
//! `CellStore` is the seam every algorithm in this crate works against: read a
//! snapshot of a cell, write a new material into it. `VoxelWorld` is the
//! in-memory implementation, `WorldSet` routes to several worlds by id.

use crate::cell::{CellRef, WorldId};
use crate::chunk::{Chunk, Voxel, CHUNK_SIZE};
use crate::material::{DataValue, Material};
use ahash::{AHashMap, AHashSet};
use glam::IVec3;

/// Read/write access to grid cells across worlds
pub trait CellStore {
    /// Snapshot of the cell, or `None` if the location is not addressable
    /// (unknown world, outside the vertical range).
    fn cell(&self, world: WorldId, pos: IVec3) -> Option<CellRef>;

    /// Overwrite the cell. Returns false if the location is not addressable.
    fn set_cell(&mut self, world: WorldId, pos: IVec3, material: Material, data: DataValue)
        -> bool;

    /// Restore a cell to the state captured in `cell`
    fn restore(&mut self, cell: &CellRef) -> bool {
        self.set_cell(cell.world, cell.position, cell.material, cell.data)
    }
}

/// Dirty chunk tracking so renderers and clients can be told what changed
#[derive(Debug, Clone, Default)]
pub struct DirtyRegions {
    dirty_chunks: AHashSet<IVec3>,
}

impl DirtyRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_chunk_dirty(&mut self, chunk_pos: IVec3) {
        self.dirty_chunks.insert(chunk_pos);
    }

    /// Marks the containing chunk, plus the neighbour across any face the
    /// position touches.
    pub fn mark_position_dirty(&mut self, world_pos: IVec3) {
        let chunk_pos = world_to_chunk_pos(world_pos);
        self.dirty_chunks.insert(chunk_pos);

        let local = world_pos - chunk_pos * CHUNK_SIZE as i32;
        let last = CHUNK_SIZE as i32 - 1;
        for axis in 0..3 {
            let offset = match local[axis] {
                0 => -1,
                l if l == last => 1,
                _ => continue,
            };
            let mut neighbor = chunk_pos;
            neighbor[axis] += offset;
            self.dirty_chunks.insert(neighbor);
        }
    }

    /// Drain all dirty chunk positions
    pub fn take_dirty_chunks(&mut self) -> Vec<IVec3> {
        self.dirty_chunks.drain().collect()
    }

    pub fn is_chunk_dirty(&self, chunk_pos: IVec3) -> bool {
        self.dirty_chunks.contains(&chunk_pos)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty_chunks.len()
    }
}

/// Vertical extent of a world, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightRange {
    pub min_y: i32,
    pub max_y: i32,
}

impl HeightRange {
    #[inline]
    pub fn contains(&self, y: i32) -> bool {
        y >= self.min_y && y <= self.max_y
    }
}

/// A single world: sparse chunks, unloaded chunks read as air
pub struct VoxelWorld {
    id: WorldId,
    chunks: AHashMap<IVec3, Chunk>,
    height: Option<HeightRange>,
    dirty: DirtyRegions,
}

impl VoxelWorld {
    /// Unbounded world
    pub fn new(id: WorldId) -> Self {
        Self {
            id,
            chunks: AHashMap::new(),
            height: None,
            dirty: DirtyRegions::new(),
        }
    }

    /// World limited to `min_y..=max_y`
    pub fn with_height(id: WorldId, min_y: i32, max_y: i32) -> Self {
        Self {
            height: Some(HeightRange { min_y, max_y }),
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn height(&self) -> Option<HeightRange> {
        self.height
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        self.height.map_or(true, |h| h.contains(pos.y))
    }

    pub fn get(&self, pos: IVec3) -> Voxel {
        let (chunk_pos, (x, y, z)) = split_world_pos(pos);
        self.chunks
            .get(&chunk_pos)
            .map(|c| c.get(x, y, z))
            .unwrap_or(Voxel::AIR)
    }

    /// Writes a voxel, returning the previous one. Out-of-range writes are
    /// dropped and return `None`.
    pub fn set(&mut self, pos: IVec3, voxel: Voxel) -> Option<Voxel> {
        if !self.contains(pos) {
            return None;
        }
        let (chunk_pos, (x, y, z)) = split_world_pos(pos);
        let chunk = self.chunks.entry(chunk_pos).or_insert_with(Chunk::new_empty);
        let old = chunk.set(x, y, z, voxel);
        if old != voxel {
            self.dirty.mark_position_dirty(pos);
        }
        Some(old)
    }

    /// Fill an inclusive box, for building test scenes
    pub fn fill_box(&mut self, a: IVec3, b: IVec3, voxel: Voxel) {
        let min = a.min(b);
        let max = a.max(b);
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set(IVec3::new(x, y, z), voxel);
                }
            }
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drop chunks that hold nothing but air
    pub fn remove_empty_chunks(&mut self) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|_, c| !c.is_empty());
        before - self.chunks.len()
    }

    pub fn dirty_regions(&self) -> &DirtyRegions {
        &self.dirty
    }

    pub fn take_dirty_chunks(&mut self) -> Vec<IVec3> {
        self.dirty.take_dirty_chunks()
    }
}

impl CellStore for VoxelWorld {
    fn cell(&self, world: WorldId, pos: IVec3) -> Option<CellRef> {
        if world != self.id || !self.contains(pos) {
            return None;
        }
        let v = self.get(pos);
        Some(CellRef::new(world, pos, v.material, v.data))
    }

    fn set_cell(
        &mut self,
        world: WorldId,
        pos: IVec3,
        material: Material,
        data: DataValue,
    ) -> bool {
        world == self.id && self.set(pos, Voxel::new(material, data)).is_some()
    }
}

/// Several worlds addressed by id
#[derive(Default)]
pub struct WorldSet {
    worlds: AHashMap<WorldId, VoxelWorld>,
}

impl WorldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a world, replacing any with the same id
    pub fn insert(&mut self, world: VoxelWorld) -> Option<VoxelWorld> {
        self.worlds.insert(world.id(), world)
    }

    pub fn get(&self, id: WorldId) -> Option<&VoxelWorld> {
        self.worlds.get(&id)
    }

    pub fn get_mut(&mut self, id: WorldId) -> Option<&mut VoxelWorld> {
        self.worlds.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

impl CellStore for WorldSet {
    fn cell(&self, world: WorldId, pos: IVec3) -> Option<CellRef> {
        self.worlds.get(&world)?.cell(world, pos)
    }

    fn set_cell(
        &mut self,
        world: WorldId,
        pos: IVec3,
        material: Material,
        data: DataValue,
    ) -> bool {
        self.worlds
            .get_mut(&world)
            .map_or(false, |w| w.set_cell(world, pos, material, data))
    }
}

/// Convert world position to chunk position
pub fn world_to_chunk_pos(world_pos: IVec3) -> IVec3 {
    IVec3::new(
        world_pos.x.div_euclid(CHUNK_SIZE as i32),
        world_pos.y.div_euclid(CHUNK_SIZE as i32),
        world_pos.z.div_euclid(CHUNK_SIZE as i32),
    )
}

fn split_world_pos(pos: IVec3) -> (IVec3, (usize, usize, usize)) {
    let cs = CHUNK_SIZE as i32;
    let chunk = world_to_chunk_pos(pos);
    let local = (
        pos.x.rem_euclid(cs) as usize,
        pos.y.rem_euclid(cs) as usize,
        pos.z.rem_euclid(cs) as usize,
    );
    (chunk, local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_negative_coords() {
        let mut world = VoxelWorld::new(WorldId(0));
        let pos = IVec3::new(-1, -17, 33);
        assert_eq!(world.get(pos), Voxel::AIR);

        world.set(pos, Voxel::new(Material::Stone, 3));
        assert_eq!(world.get(pos), Voxel::new(Material::Stone, 3));
        assert_eq!(world_to_chunk_pos(pos), IVec3::new(-1, -2, 2));
    }

    #[test]
    fn test_height_range_rejects_writes() {
        let mut world = VoxelWorld::with_height(WorldId(0), 0, 255);
        assert!(world.set(IVec3::new(0, -1, 0), Voxel::AIR).is_none());
        assert!(world.cell(WorldId(0), IVec3::new(0, 256, 0)).is_none());
        assert!(world.cell(WorldId(0), IVec3::new(0, 255, 0)).is_some());
    }

    #[test]
    fn test_cell_store_checks_world_id() {
        let mut world = VoxelWorld::new(WorldId(1));
        assert!(world.cell(WorldId(2), IVec3::ZERO).is_none());
        assert!(!world.set_cell(WorldId(2), IVec3::ZERO, Material::Stone, 0));
        assert!(world.set_cell(WorldId(1), IVec3::ZERO, Material::Stone, 0));
        assert_eq!(
            world.cell(WorldId(1), IVec3::ZERO).map(|c| c.material),
            Some(Material::Stone)
        );
    }

    #[test]
    fn test_dirty_marks_boundary_neighbors() {
        let mut dirty = DirtyRegions::new();
        dirty.mark_position_dirty(IVec3::new(0, 5, 15));
        assert!(dirty.is_chunk_dirty(IVec3::ZERO));
        assert!(dirty.is_chunk_dirty(IVec3::new(-1, 0, 0)));
        assert!(dirty.is_chunk_dirty(IVec3::new(0, 0, 1)));
        assert_eq!(dirty.dirty_count(), 3);
    }

    #[test]
    fn test_unchanged_write_is_not_dirty() {
        let mut world = VoxelWorld::new(WorldId(0));
        world.set(IVec3::new(5, 5, 5), Voxel::AIR);
        assert_eq!(world.dirty_regions().dirty_count(), 0);
        world.set(IVec3::new(5, 5, 5), Voxel::new(Material::Glass, 0));
        assert_eq!(world.take_dirty_chunks(), vec![IVec3::ZERO]);
    }

    #[test]
    fn test_world_set_routes_by_id() {
        let mut worlds = WorldSet::new();
        worlds.insert(VoxelWorld::new(WorldId(0)));
        worlds.insert(VoxelWorld::new(WorldId(7)));

        assert!(worlds.set_cell(WorldId(7), IVec3::ONE, Material::Wool, 4));
        assert!(!worlds.set_cell(WorldId(3), IVec3::ONE, Material::Wool, 4));
        assert_eq!(worlds.cell(WorldId(0), IVec3::ONE).unwrap().material, Material::Air);
        assert_eq!(worlds.cell(WorldId(7), IVec3::ONE).unwrap().data, 4);
    }

    #[test]
    fn test_remove_empty_chunks() {
        let mut world = VoxelWorld::new(WorldId(0));
        world.set(IVec3::ZERO, Voxel::new(Material::Stone, 0));
        world.set(IVec3::new(40, 0, 0), Voxel::new(Material::Stone, 0));
        world.set(IVec3::new(40, 0, 0), Voxel::AIR);
        assert_eq!(world.chunk_count(), 2);
        assert_eq!(world.remove_empty_chunks(), 1);
        assert_eq!(world.chunk_count(), 1);
    }
}
