//! Per-caster pending box selections
//!
//! An entry exists exactly while a caster is armed: created by the first box
//! cast, removed by the confirming cast, by cancel, or by any other fill mode.

use crate::caster::CasterId;
use ahash::AHashMap;
use voxel_engine::CellRef;

/// First corner of a box fill, waiting for the second.
///
/// Only the corner is kept. The confirming cast picks the material: its own
/// override if it has one, otherwise the material and data of `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFill {
    pub origin: CellRef,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    pending: AHashMap<CasterId, PendingFill>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `caster`, replacing any earlier selection
    pub fn arm(&mut self, caster: CasterId, pending: PendingFill) {
        self.pending.insert(caster, pending);
    }

    /// Remove and return the caster's selection
    pub fn take(&mut self, caster: CasterId) -> Option<PendingFill> {
        self.pending.remove(&caster)
    }

    pub fn get(&self, caster: CasterId) -> Option<&PendingFill> {
        self.pending.get(&caster)
    }

    pub fn is_armed(&self, caster: CasterId) -> bool {
        self.pending.contains_key(&caster)
    }

    /// Drop the caster's selection; true if there was one
    pub fn clear(&mut self, caster: CasterId) -> bool {
        self.pending.remove(&caster).is_some()
    }

    /// Number of armed casters
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use voxel_engine::{Material, OwnerId, WorldId};

    fn pending(x: i32) -> PendingFill {
        PendingFill {
            origin: CellRef::new(WorldId(0), IVec3::new(x, 0, 0), Material::Stone, 0),
        }
    }

    #[test]
    fn test_sessions_are_per_caster() {
        let mut sessions = SessionStore::new();
        sessions.arm(OwnerId(1), pending(1));
        sessions.arm(OwnerId(2), pending(2));
        assert_eq!(sessions.len(), 2);

        assert_eq!(sessions.take(OwnerId(1)), Some(pending(1)));
        assert!(!sessions.is_armed(OwnerId(1)));
        assert!(sessions.is_armed(OwnerId(2)));
        assert_eq!(sessions.take(OwnerId(1)), None);
    }

    #[test]
    fn test_rearm_replaces_selection() {
        let mut sessions = SessionStore::new();
        sessions.arm(OwnerId(1), pending(1));
        sessions.arm(OwnerId(1), pending(7));
        assert_eq!(sessions.get(OwnerId(1)).map(|p| p.origin.position.x), Some(7));
        assert!(sessions.clear(OwnerId(1)));
        assert!(!sessions.clear(OwnerId(1)));
        assert!(sessions.is_empty());
    }
}
