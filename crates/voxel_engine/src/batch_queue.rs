//! Queue of validated box fills, drained a few cells per tick
//!
//! Producers hold a cloneable `BatchSender`; the world tick owns the single
//! `BatchProcessor`. Batches are immutable messages, so the processor never
//! reaches back into the producer's state.

use crate::block_list::BlockList;
use crate::fill_batch::{FillProgress, OwnerId, ValidatedFill};
use crate::material::{DataValue, Material};
use crate::world::CellStore;
use crossbeam_channel::{Receiver, Sender};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle for an enqueued batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("batch processor is no longer running")]
    Disconnected,
}

/// Anything that accepts validated batches
pub trait BatchSink {
    fn enqueue(&self, fill: ValidatedFill) -> Result<BatchId, QueueError>;
}

/// Producer side of the batch queue
#[derive(Clone)]
pub struct BatchSender {
    tx: Sender<(BatchId, ValidatedFill)>,
    next_id: Arc<AtomicU64>,
}

impl BatchSink for BatchSender {
    fn enqueue(&self, fill: ValidatedFill) -> Result<BatchId, QueueError> {
        let id = BatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(
            batch = id.0,
            owner = fill.owner().0,
            volume = fill.volume(),
            "fill batch enqueued"
        );
        self.tx
            .send((id, fill))
            .map_err(|_| QueueError::Disconnected)?;
        Ok(id)
    }
}

/// A batch that has been fully applied
#[derive(Debug)]
pub struct CompletedFill {
    pub id: BatchId,
    pub owner: OwnerId,
    pub material: (Material, DataValue),
    /// Changed cells with their prior contents, in application order
    pub blocks: BlockList,
}

#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub total_batches: u64,
    pub total_cells: u64,
    pub pending_count: usize,
}

struct ActiveFill {
    id: BatchId,
    progress: FillProgress,
}

/// Consumer side: applies queued batches under a per-tick cell budget
pub struct BatchProcessor {
    rx: Receiver<(BatchId, ValidatedFill)>,
    active: VecDeque<ActiveFill>,
    cells_per_tick: usize,
    stats: BatchStats,
}

/// Create a connected sender / processor pair
pub fn batch_channel(cells_per_tick: usize) -> (BatchSender, BatchProcessor) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let sender = BatchSender {
        tx,
        next_id: Arc::new(AtomicU64::new(1)),
    };
    let processor = BatchProcessor {
        rx,
        active: VecDeque::new(),
        cells_per_tick: cells_per_tick.max(1),
        stats: BatchStats::default(),
    };
    (sender, processor)
}

impl BatchProcessor {
    /// Pull newly sent batches into the active list
    fn receive(&mut self) {
        for (id, fill) in self.rx.try_iter() {
            self.active.push_back(ActiveFill {
                id,
                progress: FillProgress::new(fill),
            });
        }
        self.stats.pending_count = self.active.len();
    }

    /// Apply up to `cells_per_tick` cells, oldest batch first. Returns the
    /// batches that finished during this tick.
    pub fn tick(&mut self, store: &mut dyn CellStore) -> Vec<CompletedFill> {
        self.receive();

        let mut budget = self.cells_per_tick;
        let mut completed = Vec::new();

        while budget > 0 {
            let Some(front) = self.active.front_mut() else {
                break;
            };
            let used = front.progress.step(store, budget);
            budget -= used;
            self.stats.total_cells += used as u64;

            if !front.progress.is_done() {
                continue;
            }
            if let Some(done) = self.active.pop_front() {
                let (fill, blocks) = done.progress.finish();
                self.stats.total_batches += 1;
                tracing::info!(
                    batch = done.id.0,
                    owner = fill.owner().0,
                    changed = blocks.len(),
                    "fill batch complete"
                );
                completed.push(CompletedFill {
                    id: done.id,
                    owner: fill.owner(),
                    material: fill.material(),
                    blocks,
                });
            }
        }

        self.stats.pending_count = self.active.len();
        completed
    }

    /// Batches received but not yet finished
    pub fn pending(&mut self) -> usize {
        self.receive();
        self.active.len()
    }

    /// Progress of an active batch as (processed, volume)
    pub fn progress(&self, id: BatchId) -> Option<(u64, u64)> {
        self.active
            .iter()
            .find(|a| a.id == id)
            .map(|a| (a.progress.processed(), a.progress.fill().volume()))
    }

    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }
}
