//! Insertion-ordered set of touched cells
//!
//! Used both as the output of a traversal and as an undo record. Entries are
//! unique by world + coordinate; the first snapshot of a cell wins, so an undo
//! restores what was there before the operation started.

use crate::cell::{CellKey, CellRef};
use ahash::AHashSet;

#[derive(Debug, Clone, Default)]
pub struct BlockList {
    cells: Vec<CellRef>,
    keys: AHashSet<CellKey>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            keys: AHashSet::with_capacity(capacity),
        }
    }

    /// Appends the cell unless its location is already recorded.
    /// Returns whether it was added.
    pub fn add(&mut self, cell: CellRef) -> bool {
        if !self.keys.insert(cell.key()) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellRef> {
        self.cells.iter()
    }

    pub fn as_slice(&self) -> &[CellRef] {
        &self.cells
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a CellRef;
    type IntoIter = std::slice::Iter<'a, CellRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl IntoIterator for BlockList {
    type Item = CellRef;
    type IntoIter = std::vec::IntoIter<CellRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl FromIterator<CellRef> for BlockList {
    fn from_iter<I: IntoIterator<Item = CellRef>>(iter: I) -> Self {
        let mut list = BlockList::new();
        for cell in iter {
            list.add(cell);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::WorldId;
    use crate::material::Material;
    use glam::IVec3;

    fn cell(world: u32, x: i32, material: Material) -> CellRef {
        CellRef::new(WorldId(world), IVec3::new(x, 0, 0), material, 0)
    }

    #[test]
    fn test_first_snapshot_wins() {
        let mut list = BlockList::new();
        assert!(list.add(cell(0, 1, Material::Stone)));
        assert!(!list.add(cell(0, 1, Material::Dirt)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].material, Material::Stone);
    }

    #[test]
    fn test_uniqueness_includes_world() {
        let list: BlockList = [cell(0, 1, Material::Stone), cell(1, 1, Material::Stone)]
            .into_iter()
            .collect();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&(WorldId(1), IVec3::new(1, 0, 0))));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut list = BlockList::new();
        for x in [5, 2, 9, 2, 1] {
            list.add(cell(0, x, Material::Sand));
        }
        let xs: Vec<i32> = list.iter().map(|c| c.position.x).collect();
        assert_eq!(xs, vec![5, 2, 9, 1]);
    }
}
