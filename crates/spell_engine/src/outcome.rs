//! Successful cast results; `Display` is the message shown to the caster

use glam::{IVec3, Vec3};
use std::fmt;
use voxel_engine::{BatchId, CellRef, Material, Truncated};

#[derive(Debug, Clone, PartialEq)]
pub enum CastOutcome {
    /// Flood fill applied immediately
    Filled {
        count: usize,
        material: Material,
        /// Set when the visit cap cut the flood short
        truncated: Option<Truncated>,
    },
    /// One cell overwritten
    Painted { material: Material, position: IVec3 },
    /// First corner selected; the next box cast confirms
    Armed {
        origin: CellRef,
        material: Material,
        /// Where to play the selection effect
        highlight: Vec3,
    },
    /// Box validated and handed to the batch queue
    Queued {
        batch: BatchId,
        material: Material,
        volume: u64,
    },
}

impl CastOutcome {
    /// Whether the caster is left with a pending selection
    pub fn is_armed(&self) -> bool {
        matches!(self, CastOutcome::Armed { .. })
    }
}

impl fmt::Display for CastOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastOutcome::Filled {
                count, material, ..
            } => write!(f, "Filled {count} blocks with {material}"),
            CastOutcome::Painted { material, .. } => write!(f, "Painting with {material}"),
            CastOutcome::Armed { material, .. } => write!(f, "Cast again to fill with {material}"),
            CastOutcome::Queued {
                material, volume, ..
            } => write!(f, "Queued {volume} blocks of {material}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NothingToCancel,
}

impl fmt::Display for CancelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelOutcome::Cancelled => f.write_str("Cancelled fill"),
            CancelOutcome::NothingToCancel => f.write_str("Nothing to cancel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxel_engine::WorldId;

    #[test]
    fn test_messages() {
        let filled = CastOutcome::Filled {
            count: 50,
            material: Material::Ice,
            truncated: None,
        };
        assert_eq!(filled.to_string(), "Filled 50 blocks with ice");

        let painted = CastOutcome::Painted {
            material: Material::StationaryWater,
            position: IVec3::ZERO,
        };
        assert_eq!(painted.to_string(), "Painting with stationary_water");

        let origin = CellRef::new(WorldId(0), IVec3::ZERO, Material::Stone, 0);
        let armed = CastOutcome::Armed {
            origin,
            material: Material::Stone,
            highlight: origin.center(),
        };
        assert!(armed.is_armed());
        assert_eq!(armed.to_string(), "Cast again to fill with stone");

        assert_eq!(CancelOutcome::Cancelled.to_string(), "Cancelled fill");
        assert_eq!(CancelOutcome::NothingToCancel.to_string(), "Nothing to cancel");
    }
}
