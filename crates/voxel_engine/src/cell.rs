//! Cell references: a snapshot of one grid location and what it held

use crate::material::{DataValue, Material};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a world (dimension) inside the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorldId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

/// Coordinate + world pair; the identity of a cell
pub type CellKey = (WorldId, IVec3);

/// Immutable snapshot of a cell, taken when it was read.
///
/// Changing the world afterwards does not update the reference. Undo records
/// rely on this: the snapshot keeps the material that was there before the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub world: WorldId,
    pub position: IVec3,
    pub material: Material,
    pub data: DataValue,
}

impl CellRef {
    pub fn new(world: WorldId, position: IVec3, material: Material, data: DataValue) -> Self {
        Self {
            world,
            position,
            material,
            data,
        }
    }

    #[inline]
    pub fn key(&self) -> CellKey {
        (self.world, self.position)
    }

    /// Center of the cell in world space
    pub fn center(&self) -> glam::Vec3 {
        self.position.as_vec3() + glam::Vec3::splat(0.5)
    }

    /// The six face-adjacent positions: ±x, ±y, ±z
    pub fn neighbors(&self) -> [IVec3; 6] {
        face_neighbors(self.position)
    }
}

/// Face-adjacent positions in a fixed order
pub fn face_neighbors(p: IVec3) -> [IVec3; 6] {
    [
        p + IVec3::X,
        p - IVec3::X,
        p + IVec3::Y,
        p - IVec3::Y,
        p + IVec3::Z,
        p - IVec3::Z,
    ]
}
