//! Who is casting: identity, aim, permissions and build multipliers

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use voxel_engine::{Aim, CellRef, DataValue, Material, OwnerId, WorldId};

/// Identity of a caster; doubles as the owner of queued batches and undo records
pub type CasterId = OwnerId;

/// Everything the fill spell needs to know about the one casting it
pub trait Caster {
    fn id(&self) -> CasterId;

    /// Where the caster is currently looking
    fn aim(&self) -> Aim;

    /// Whether the caster may modify `cell`
    fn has_build_permission(&self, cell: &CellRef) -> bool;

    /// Scales the recursion size of flood fills
    fn radius_multiplier(&self) -> f32 {
        1.0
    }

    /// Scales the box limits of deferred fills
    fn construction_multiplier(&self) -> f32 {
        1.0
    }

    /// Material the caster is building with, if any
    fn building_material(&self) -> Option<(Material, DataValue)> {
        None
    }
}

/// Inclusive box of cells no caster with this profile may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedRegion {
    pub world: WorldId,
    pub min: IVec3,
    pub max: IVec3,
}

impl ProtectedRegion {
    pub fn new(world: WorldId, a: IVec3, b: IVec3) -> Self {
        Self {
            world,
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        cell.world == self.world
            && cell.position.cmpge(self.min).all()
            && cell.position.cmple(self.max).all()
    }
}

/// Plain-data caster used by the sandbox and by tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasterProfile {
    pub id: CasterId,
    pub world: WorldId,
    pub eye: Vec3,
    pub look: Vec3,
    pub reach: f32,
    pub radius_multiplier: f32,
    pub construction_multiplier: f32,
    pub building_material: Option<(Material, DataValue)>,
    pub protected: Vec<ProtectedRegion>,
}

impl CasterProfile {
    pub fn new(id: CasterId, world: WorldId) -> Self {
        Self {
            id,
            world,
            eye: Vec3::ZERO,
            look: Vec3::NEG_Y,
            reach: 64.0,
            radius_multiplier: 1.0,
            construction_multiplier: 1.0,
            building_material: None,
            protected: Vec::new(),
        }
    }

    /// Point the caster's eye from `eye` towards `target`
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.look = (target - eye).normalize_or_zero();
    }

    /// Stand directly above `cell` and look straight down at it
    pub fn look_down_at(&mut self, cell: IVec3, height: f32) {
        let center = cell.as_vec3() + Vec3::splat(0.5);
        self.look_at(center + Vec3::Y * height, center);
    }

    pub fn protect(&mut self, region: ProtectedRegion) {
        self.protected.push(region);
    }
}

impl Caster for CasterProfile {
    fn id(&self) -> CasterId {
        self.id
    }

    fn aim(&self) -> Aim {
        Aim::new(self.world, self.eye, self.look, self.reach)
    }

    fn has_build_permission(&self, cell: &CellRef) -> bool {
        !self.protected.iter().any(|r| r.contains(cell))
    }

    fn radius_multiplier(&self) -> f32 {
        self.radius_multiplier
    }

    fn construction_multiplier(&self) -> f32 {
        self.construction_multiplier
    }

    fn building_material(&self) -> Option<(Material, DataValue)> {
        self.building_material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_region_bounds() {
        let region = ProtectedRegion::new(WorldId(1), IVec3::new(4, 0, 4), IVec3::new(0, 2, 0));
        let at = |w: u32, x: i32, y: i32, z: i32| {
            CellRef::new(WorldId(w), IVec3::new(x, y, z), Material::Stone, 0)
        };
        assert!(region.contains(&at(1, 0, 0, 0)));
        assert!(region.contains(&at(1, 4, 2, 4)));
        assert!(!region.contains(&at(1, 5, 2, 4)));
        assert!(!region.contains(&at(0, 1, 1, 1)));
    }

    #[test]
    fn test_profile_permission() {
        let mut profile = CasterProfile::new(OwnerId(3), WorldId(0));
        let cell = CellRef::new(WorldId(0), IVec3::new(2, 0, 2), Material::Dirt, 0);
        assert!(profile.has_build_permission(&cell));

        profile.protect(ProtectedRegion::new(WorldId(0), IVec3::ZERO, IVec3::splat(3)));
        assert!(!profile.has_build_permission(&cell));
    }

    #[test]
    fn test_look_down_at() {
        let mut profile = CasterProfile::new(OwnerId(1), WorldId(0));
        profile.look_down_at(IVec3::new(3, 0, -2), 5.0);
        let aim = profile.aim();
        assert_eq!(aim.direction, Vec3::NEG_Y);
        assert_eq!(aim.origin, Vec3::new(3.5, 5.5, -1.5));
    }
}
