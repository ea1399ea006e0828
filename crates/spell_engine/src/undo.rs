//! Per-caster undo history
//!
//! Each successful mutation hands its complete `BlockList` over once. Undoing
//! writes every recorded snapshot back, newest cell first.

use crate::caster::CasterId;
use ahash::AHashMap;
use std::collections::VecDeque;
use voxel_engine::{BlockList, CellStore};

/// Receives the affected cells of each completed mutation
pub trait UndoSink {
    fn register(&mut self, owner: CasterId, blocks: BlockList);
}

/// Bounded undo stacks, one per caster
#[derive(Debug)]
pub struct UndoQueue {
    max_entries: usize,
    history: AHashMap<CasterId, VecDeque<BlockList>>,
}

impl UndoQueue {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            history: AHashMap::new(),
        }
    }

    /// Records held for `owner`
    pub fn depth(&self, owner: CasterId) -> usize {
        self.history.get(&owner).map_or(0, VecDeque::len)
    }

    /// Most recent record for `owner`
    pub fn peek(&self, owner: CasterId) -> Option<&BlockList> {
        self.history.get(&owner)?.back()
    }

    /// Revert the newest record of `owner`. Returns how many cells were
    /// restored, or `None` if there was nothing to undo.
    pub fn undo(&mut self, owner: CasterId, store: &mut dyn CellStore) -> Option<usize> {
        let blocks = self.history.get_mut(&owner)?.pop_back()?;
        let restored = blocks
            .as_slice()
            .iter()
            .rev()
            .filter(|cell| store.restore(cell))
            .count();
        tracing::info!(owner = owner.0, restored, "undo applied");
        Some(restored)
    }

    pub fn clear(&mut self, owner: CasterId) {
        self.history.remove(&owner);
    }
}

impl UndoSink for UndoQueue {
    fn register(&mut self, owner: CasterId, blocks: BlockList) {
        if blocks.is_empty() {
            return;
        }
        let stack = self.history.entry(owner).or_default();
        if stack.len() >= self.max_entries {
            stack.pop_front();
            tracing::debug!(owner = owner.0, "oldest undo record dropped");
        }
        tracing::debug!(owner = owner.0, cells = blocks.len(), "undo record registered");
        stack.push_back(blocks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use voxel_engine::{CellRef, Material, OwnerId, Voxel, VoxelWorld, WorldId};

    const W: WorldId = WorldId(0);
    const OWNER: OwnerId = OwnerId(1);

    /// Write `material` at each position, returning the undo record
    fn edit(world: &mut VoxelWorld, positions: &[IVec3], material: Material) -> BlockList {
        let mut blocks = BlockList::new();
        for &p in positions {
            if let Some(before) = world.cell(W, p) {
                world.set_cell(W, p, material, 0);
                blocks.add(before);
            }
        }
        blocks
    }

    #[test]
    fn test_undo_restores_prior_state() {
        let mut world = VoxelWorld::new(W);
        world.set(IVec3::X, Voxel::new(Material::Wool, 5));
        let mut undo = UndoQueue::new(8);

        let blocks = edit(&mut world, &[IVec3::ZERO, IVec3::X], Material::Glass);
        undo.register(OWNER, blocks);
        assert_eq!(undo.depth(OWNER), 1);

        assert_eq!(undo.undo(OWNER, &mut world), Some(2));
        assert_eq!(world.get(IVec3::ZERO), Voxel::AIR);
        assert_eq!(world.get(IVec3::X), Voxel::new(Material::Wool, 5));
        assert_eq!(undo.undo(OWNER, &mut world), None);
    }

    #[test]
    fn test_undo_is_newest_first() {
        let mut world = VoxelWorld::new(W);
        let mut undo = UndoQueue::new(8);

        undo.register(OWNER, edit(&mut world, &[IVec3::ZERO], Material::Stone));
        undo.register(OWNER, edit(&mut world, &[IVec3::ZERO], Material::Sand));

        undo.undo(OWNER, &mut world);
        assert_eq!(world.get(IVec3::ZERO).material, Material::Stone);
        undo.undo(OWNER, &mut world);
        assert_eq!(world.get(IVec3::ZERO).material, Material::Air);
    }

    #[test]
    fn test_history_is_bounded_and_per_owner() {
        let mut world = VoxelWorld::new(W);
        let mut undo = UndoQueue::new(2);
        for x in 0..3 {
            undo.register(OWNER, edit(&mut world, &[IVec3::new(x, 0, 0)], Material::Dirt));
        }
        assert_eq!(undo.depth(OWNER), 2);
        assert_eq!(undo.depth(OwnerId(2)), 0);
        assert_eq!(
            undo.peek(OWNER).map(|b| b.as_slice()[0]),
            Some(CellRef::new(W, IVec3::new(2, 0, 0), Material::Air, 0))
        );
    }

    #[test]
    fn test_empty_record_is_ignored() {
        let mut undo = UndoQueue::new(2);
        undo.register(OWNER, BlockList::new());
        assert_eq!(undo.depth(OWNER), 0);
    }
}
