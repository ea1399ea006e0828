#![forbid(unsafe_code)]
//! Voxel world storage and the bulk-edit primitives built on it:
//! bounded flood traversal, replace-material fills, validated deferred box
//! fills and the queue that applies them over several ticks.

pub mod batch_queue;
pub mod block_list;
pub mod cell;
pub mod chunk;
pub mod fill_batch;
pub mod material;
pub mod raycast;
pub mod recurse;
pub mod replace;
pub mod world;

pub use batch_queue::{
    batch_channel, BatchId, BatchProcessor, BatchSender, BatchSink, BatchStats, CompletedFill,
    QueueError,
};
pub use block_list::BlockList;
pub use cell::{CellKey, CellRef, WorldId};
pub use chunk::{Chunk, Voxel, CHUNK_SIZE};
pub use fill_batch::{
    FillBatch, FillLimits, FillProgress, LimitExceeded, OwnerId, ValidatedFill,
};
pub use material::{DataValue, Material};
pub use raycast::{Aim, RaycastHit, RaycastTargeting, Targeting};
pub use recurse::{ActionOutcome, BlockRecurse, CellAction, Traversal, Truncated};
pub use replace::ReplaceMaterialAction;
pub use world::{CellStore, DirtyRegions, VoxelWorld, WorldSet};
