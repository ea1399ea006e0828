//! Deferred box fills
//!
//! A `FillBatch` describes an inclusive box and the material to put in it.
//! Construction never touches the world. Size checks are pure predicates, and
//! only a batch that passed both of them becomes a `ValidatedFill`, the sole
//! type the batch queue accepts.

use crate::block_list::BlockList;
use crate::cell::{CellRef, WorldId};
use crate::material::{DataValue, Material};
use crate::world::CellStore;
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Who requested an edit; carried so completed work can be credited back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

/// Size caps for a box fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillLimits {
    /// Longest allowed edge, in cells
    pub max_dimension: u64,
    /// Largest allowed cell count
    pub max_volume: u64,
}

impl FillLimits {
    pub const DEFAULT_MAX_DIMENSION: u64 = 128;
    pub const DEFAULT_MAX_VOLUME: u64 = 512;

    pub fn new(max_dimension: u64, max_volume: u64) -> Self {
        Self {
            max_dimension,
            max_volume,
        }
    }

    /// Both caps multiplied by `factor`, truncated
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            max_dimension: scale(self.max_dimension, factor),
            max_volume: scale(self.max_volume, factor),
        }
    }
}

impl Default for FillLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DIMENSION, Self::DEFAULT_MAX_VOLUME)
    }
}

fn scale(value: u64, factor: f32) -> u64 {
    let scaled = value as f64 * f64::from(factor.max(0.0));
    if scaled >= u64::MAX as f64 {
        u64::MAX
    } else {
        scaled as u64
    }
}

/// Which cap a batch broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LimitExceeded {
    #[error("Dimension is too big!")]
    Dimension { size: u64, limit: u64 },
    #[error("Volume is too big!")]
    Volume { size: u64, limit: u64 },
}

/// Unvalidated description of a box fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillBatch {
    world: WorldId,
    min: IVec3,
    max: IVec3,
    material: Material,
    data: DataValue,
    owner: OwnerId,
    dimension: u64,
    volume: u64,
}

impl FillBatch {
    /// Box spanning `a` to `b` inclusive, in `a`'s world.
    pub fn new(
        a: CellRef,
        b: CellRef,
        material: Material,
        data: DataValue,
        owner: OwnerId,
    ) -> Self {
        let min = a.position.min(b.position);
        let max = a.position.max(b.position);
        let extent = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo)) as u64 + 1;
        let (sx, sy, sz) = (
            extent(min.x, max.x),
            extent(min.y, max.y),
            extent(min.z, max.z),
        );

        Self {
            world: a.world,
            min,
            max,
            material,
            data,
            owner,
            dimension: sx.max(sy).max(sz),
            volume: sx.saturating_mul(sy).saturating_mul(sz),
        }
    }

    /// Longest edge of the box, in cells
    pub fn dimension(&self) -> u64 {
        self.dimension
    }

    /// Number of cells in the box
    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn check_dimension(&self, limit: u64) -> bool {
        self.dimension <= limit
    }

    pub fn check_volume(&self, limit: u64) -> bool {
        self.volume <= limit
    }

    /// Dimension first, then volume.
    pub fn validate(self, limits: &FillLimits) -> Result<ValidatedFill, LimitExceeded> {
        if !self.check_dimension(limits.max_dimension) {
            return Err(LimitExceeded::Dimension {
                size: self.dimension,
                limit: limits.max_dimension,
            });
        }
        if !self.check_volume(limits.max_volume) {
            return Err(LimitExceeded::Volume {
                size: self.volume,
                limit: limits.max_volume,
            });
        }
        Ok(ValidatedFill { batch: self })
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    pub fn bounds(&self) -> (IVec3, IVec3) {
        (self.min, self.max)
    }

    pub fn material(&self) -> (Material, DataValue) {
        (self.material, self.data)
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Size along each axis
    pub fn size(&self) -> (u64, u64, u64) {
        let extent = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo)) as u64 + 1;
        (
            extent(self.min.x, self.max.x),
            extent(self.min.y, self.max.y),
            extent(self.min.z, self.max.z),
        )
    }

    /// Position of the `index`th cell in scan order: x fastest, then z, then
    /// y, so the box fills from the bottom up.
    fn position_at(&self, index: u64) -> IVec3 {
        let (sx, _, sz) = self.size();
        let x = index % sx;
        let z = (index / sx) % sz;
        // Saturates for boxes near the full coordinate range
        let y = index / sx.saturating_mul(sz);
        // Offsets past i32::MAX wrap back into range relative to `min`
        IVec3::new(
            self.min.x.wrapping_add(x as i32),
            self.min.y.wrapping_add(y as i32),
            self.min.z.wrapping_add(z as i32),
        )
    }
}

/// A batch that passed both size checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFill {
    batch: FillBatch,
}

impl std::ops::Deref for ValidatedFill {
    type Target = FillBatch;

    fn deref(&self) -> &FillBatch {
        &self.batch
    }
}

/// Incremental application of one validated batch
#[derive(Debug)]
pub struct FillProgress {
    fill: ValidatedFill,
    next: u64,
    blocks: BlockList,
}

impl FillProgress {
    pub fn new(fill: ValidatedFill) -> Self {
        Self {
            fill,
            next: 0,
            blocks: BlockList::new(),
        }
    }

    /// Apply up to `budget` cells. Returns how many cells were visited.
    ///
    /// Cells whose contents change are recorded with their prior state.
    pub fn step(&mut self, store: &mut dyn CellStore, budget: usize) -> usize {
        let (material, data) = self.fill.material();
        let world = self.fill.world();
        let mut visited = 0;

        while visited < budget && !self.is_done() {
            let pos = self.fill.position_at(self.next);
            self.next += 1;
            visited += 1;

            let Some(before) = store.cell(world, pos) else {
                continue;
            };
            if before.material == material && before.data == data {
                continue;
            }
            if store.set_cell(world, pos, material, data) {
                self.blocks.add(before);
            }
        }
        visited
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.fill.volume()
    }

    /// Cells visited so far
    pub fn processed(&self) -> u64 {
        self.next
    }

    pub fn fill(&self) -> &ValidatedFill {
        &self.fill
    }

    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    pub fn finish(self) -> (ValidatedFill, BlockList) {
        (self.fill, self.blocks)
    }
}
