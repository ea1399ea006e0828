//! Replace-material flood action

use crate::cell::CellRef;
use crate::material::{DataValue, Material};
use crate::recurse::{ActionOutcome, CellAction};
use crate::world::CellStore;
use smallvec::SmallVec;

/// Overwrites any cell whose material is in the replaceable set.
///
/// Seeded with the origin's own material, so by default the traversal behaves
/// as a same-material flood fill.
#[derive(Debug, Clone)]
pub struct ReplaceMaterialAction {
    material: Material,
    data: DataValue,
    replaceable: SmallVec<[Material; 4]>,
    replaced: usize,
}

impl ReplaceMaterialAction {
    /// Replace cells matching `origin`'s material with `material`/`data`
    pub fn new(origin: &CellRef, material: Material, data: DataValue) -> Self {
        Self::with_replaceable(origin.material, material, data)
    }

    pub fn with_replaceable(source: Material, material: Material, data: DataValue) -> Self {
        let mut replaceable = SmallVec::new();
        replaceable.push(source);
        Self {
            material,
            data,
            replaceable,
            replaced: 0,
        }
    }

    /// Like `new`, and also treats the other form of a liquid origin as the
    /// same body (still water floods into flowing water and back).
    pub fn for_origin(origin: &CellRef, material: Material, data: DataValue) -> Self {
        let mut action = Self::new(origin, material, data);
        if let Some(counterpart) = origin.material.liquid_counterpart() {
            action.add_replaceable(counterpart);
        }
        action
    }

    pub fn add_replaceable(&mut self, material: Material) {
        if !self.replaceable.contains(&material) {
            self.replaceable.push(material);
        }
    }

    pub fn is_replaceable(&self, material: Material) -> bool {
        self.replaceable.contains(&material)
    }

    pub fn replaceable(&self) -> &[Material] {
        &self.replaceable
    }

    /// Cells overwritten so far
    pub fn replaced(&self) -> usize {
        self.replaced
    }
}

impl CellAction for ReplaceMaterialAction {
    fn perform(&mut self, store: &mut dyn CellStore, cell: &CellRef) -> ActionOutcome {
        if !self.is_replaceable(cell.material) {
            return ActionOutcome::Skip;
        }
        if !store.set_cell(cell.world, cell.position, self.material, self.data) {
            return ActionOutcome::Skip;
        }
        self.replaced += 1;
        ActionOutcome::Continue
    }
}
