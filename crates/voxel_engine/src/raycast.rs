//! DDA 3D voxel raycast and aim-based targeting
//!
//! References:
//! - "A Fast Voxel Traversal Algorithm for Ray Tracing" by John Amanatides & Andrew Woo

use crate::cell::{CellRef, WorldId};
use crate::material::Material;
use crate::world::CellStore;
use glam::{IVec3, Vec3};

/// Upper bound on grid steps for a single ray
const MAX_STEPS: u32 = 512;

/// Result of a voxel raycast
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The hit cell as it was when the ray reached it
    pub cell: CellRef,

    /// Normal of the hit face: one of (±1, 0, 0), (0, ±1, 0), (0, 0, ±1),
    /// or zero when the ray starts inside the hit cell
    pub normal: IVec3,

    /// Distance from ray origin to hit point
    pub distance: f32,

    /// Position of the cell in front of the hit face (for placement)
    pub adjacent_position: IVec3,
}

/// Voxel traversal using DDA.
///
/// `is_hit` is called for each visited cell in order; the first `Some` ends
/// the walk. `direction` must be normalized.
pub fn raycast_dda<T, F>(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    mut is_hit: F,
) -> Option<(T, IVec3, IVec3, f32)>
where
    F: FnMut(IVec3) -> Option<T>,
{
    let mut voxel = origin.floor().as_ivec3();

    let step = IVec3::new(
        if direction.x > 0.0 { 1 } else { -1 },
        if direction.y > 0.0 { 1 } else { -1 },
        if direction.z > 0.0 { 1 } else { -1 },
    );

    // Ray length needed to cross one cell along each axis
    let delta = Vec3::new(
        axis_delta(direction.x),
        axis_delta(direction.y),
        axis_delta(direction.z),
    );

    // Ray length to the first boundary along each axis
    let mut t_max = Vec3::new(
        first_boundary(origin.x, voxel.x, direction.x),
        first_boundary(origin.y, voxel.y, direction.y),
        first_boundary(origin.z, voxel.z, direction.z),
    );

    let mut normal = IVec3::ZERO;
    let mut distance = 0.0;

    for _ in 0..MAX_STEPS {
        if let Some(hit) = is_hit(voxel) {
            return Some((hit, voxel, normal, distance));
        }

        if distance > max_distance {
            break;
        }

        if t_max.x < t_max.y {
            if t_max.x < t_max.z {
                voxel.x += step.x;
                distance = t_max.x;
                t_max.x += delta.x;
                normal = IVec3::new(-step.x, 0, 0);
            } else {
                voxel.z += step.z;
                distance = t_max.z;
                t_max.z += delta.z;
                normal = IVec3::new(0, 0, -step.z);
            }
        } else if t_max.y < t_max.z {
            voxel.y += step.y;
            distance = t_max.y;
            t_max.y += delta.y;
            normal = IVec3::new(0, -step.y, 0);
        } else {
            voxel.z += step.z;
            distance = t_max.z;
            t_max.z += delta.z;
            normal = IVec3::new(0, 0, -step.z);
        }
    }

    None
}

#[inline]
fn axis_delta(d: f32) -> f32 {
    if d.abs() < 1e-10 {
        f32::INFINITY
    } else {
        (1.0 / d).abs()
    }
}

#[inline]
fn first_boundary(origin: f32, voxel: i32, d: f32) -> f32 {
    if d > 0.0 {
        (voxel as f32 + 1.0 - origin) / d
    } else if d < 0.0 {
        (origin - voxel as f32) / -d
    } else {
        f32::INFINITY
    }
}

/// Where a caster is looking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub world: WorldId,
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
}

impl Aim {
    pub fn new(world: WorldId, origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            world,
            origin,
            direction: direction.normalize_or_zero(),
            max_distance,
        }
    }
}

/// Resolves the cell under a caster's aim
pub trait Targeting {
    /// First cell along `aim` that is neither air nor one of `see_through`
    fn resolve(&self, store: &dyn CellStore, aim: &Aim, see_through: &[Material])
        -> Option<RaycastHit>;
}

/// `Targeting` by DDA raycast against the store
#[derive(Debug, Clone, Copy, Default)]
pub struct RaycastTargeting;

impl Targeting for RaycastTargeting {
    fn resolve(
        &self,
        store: &dyn CellStore,
        aim: &Aim,
        see_through: &[Material],
    ) -> Option<RaycastHit> {
        if aim.direction == Vec3::ZERO {
            return None;
        }
        let (cell, position, normal, distance) =
            raycast_dda(aim.origin, aim.direction, aim.max_distance, |pos| {
                store
                    .cell(aim.world, pos)
                    .filter(|c| !c.material.is_air() && !see_through.contains(&c.material))
            })?;

        Some(RaycastHit {
            cell,
            normal,
            distance,
            adjacent_position: position + normal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Voxel;
    use crate::world::VoxelWorld;

    const W: WorldId = WorldId(0);

    #[test]
    fn test_hits_first_solid() {
        let mut world = VoxelWorld::new(W);
        world.set(IVec3::new(5, 0, 0), Voxel::new(Material::Stone, 0));
        world.set(IVec3::new(8, 0, 0), Voxel::new(Material::Dirt, 0));

        let aim = Aim::new(W, Vec3::new(0.5, 0.5, 0.5), Vec3::X, 32.0);
        let hit = RaycastTargeting.resolve(&world, &aim, &[]).unwrap();
        assert_eq!(hit.cell.position, IVec3::new(5, 0, 0));
        assert_eq!(hit.normal, IVec3::new(-1, 0, 0));
        assert_eq!(hit.adjacent_position, IVec3::new(4, 0, 0));
        assert!((hit.distance - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_see_through_materials() {
        let mut world = VoxelWorld::new(W);
        world.fill_box(IVec3::new(0, 0, 0), IVec3::new(0, 3, 0), Voxel::new(Material::StationaryWater, 0));
        world.set(IVec3::new(0, -1, 0), Voxel::new(Material::Sand, 0));

        let aim = Aim::new(W, Vec3::new(0.5, 6.5, 0.5), Vec3::NEG_Y, 32.0);
        let see_through = [Material::Water, Material::StationaryWater];

        let hit = RaycastTargeting.resolve(&world, &aim, &see_through).unwrap();
        assert_eq!(hit.cell.material, Material::Sand);

        let hit = RaycastTargeting.resolve(&world, &aim, &[]).unwrap();
        assert_eq!(hit.cell.position, IVec3::new(0, 3, 0));
    }

    #[test]
    fn test_miss_beyond_range() {
        let mut world = VoxelWorld::new(W);
        world.set(IVec3::new(20, 0, 0), Voxel::new(Material::Stone, 0));
        let aim = Aim::new(W, Vec3::new(0.5, 0.5, 0.5), Vec3::X, 10.0);
        assert!(RaycastTargeting.resolve(&world, &aim, &[]).is_none());
    }

    #[test]
    fn test_zero_direction_has_no_target() {
        let world = VoxelWorld::new(W);
        let aim = Aim::new(W, Vec3::ZERO, Vec3::ZERO, 10.0);
        assert!(RaycastTargeting.resolve(&world, &aim, &[]).is_none());
    }
}
