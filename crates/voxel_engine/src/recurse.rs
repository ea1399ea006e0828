//! Bounded flood traversal over face-connected cells
//!
//! The traversal owns the frontier, the visited set and the resource cap. What
//! happens to each reached cell is decided by a `CellAction`, so the same
//! engine serves replace-fills, counting, painting patterns and so on.
//!
//! Guarantees:
//! - every location is evaluated at most once, so cyclic connectivity terminates
//! - at most `max_visits` cells are recorded
//! - every recorded cell is reachable from the origin through recorded cells

use crate::block_list::BlockList;
use crate::cell::{CellRef, WorldId};
use crate::world::CellStore;
use ahash::AHashSet;
use glam::IVec3;
use std::collections::VecDeque;

/// What the action did with a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Acted on the cell; record it and expand to its neighbours
    Continue,
    /// Acted on the cell; record it but do not expand from it
    Stop,
    /// Left the cell alone; neither recorded nor expanded
    Skip,
}

/// Per-cell behaviour plugged into `BlockRecurse`.
///
/// `cell` is the snapshot read before the action ran. The action may write the
/// store at that location; the snapshot is what gets recorded.
pub trait CellAction {
    fn perform(&mut self, store: &mut dyn CellStore, cell: &CellRef) -> ActionOutcome;
}

impl<F> CellAction for F
where
    F: FnMut(&mut dyn CellStore, &CellRef) -> ActionOutcome,
{
    fn perform(&mut self, store: &mut dyn CellStore, cell: &CellRef) -> ActionOutcome {
        self(store, cell)
    }
}

/// The visit cap was hit while cells were still waiting in the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated {
    pub max_visits: usize,
}

/// Result of one traversal
#[derive(Debug, Clone)]
pub struct Traversal {
    /// Recorded cells in visit order, with their pre-action state
    pub blocks: BlockList,
    /// Number of cells handed to the action
    pub evaluated: usize,
    pub truncated: Option<Truncated>,
}

impl Traversal {
    pub fn is_truncated(&self) -> bool {
        self.truncated.is_some()
    }
}

/// Breadth-first flood traversal with a hard cap on recorded cells
#[derive(Debug, Clone)]
pub struct BlockRecurse {
    max_visits: usize,
    max_depth: Option<u32>,
}

impl Default for BlockRecurse {
    fn default() -> Self {
        Self::new(8)
    }
}

impl BlockRecurse {
    pub fn new(max_visits: usize) -> Self {
        Self {
            max_visits,
            max_depth: None,
        }
    }

    /// Also stop expanding past `depth` steps from the origin
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Run the traversal from `origin` in `world`.
    pub fn recurse<A>(
        &self,
        store: &mut dyn CellStore,
        world: WorldId,
        origin: IVec3,
        action: &mut A,
    ) -> Traversal
    where
        A: CellAction + ?Sized,
    {
        let mut blocks = BlockList::new();
        let mut evaluated = 0usize;
        let mut visited: AHashSet<IVec3> = AHashSet::new();
        let mut frontier: VecDeque<(IVec3, u32)> = VecDeque::new();

        visited.insert(origin);
        frontier.push_back((origin, 0));

        while !frontier.is_empty() {
            if blocks.len() >= self.max_visits {
                tracing::debug!(
                    ?origin,
                    max_visits = self.max_visits,
                    pending = frontier.len(),
                    "flood traversal truncated"
                );
                return Traversal {
                    blocks,
                    evaluated,
                    truncated: Some(Truncated {
                        max_visits: self.max_visits,
                    }),
                };
            }

            let Some((pos, depth)) = frontier.pop_front() else {
                break;
            };

            // Unaddressable locations behave like a wall
            let Some(cell) = store.cell(world, pos) else {
                continue;
            };

            evaluated += 1;
            match action.perform(store, &cell) {
                ActionOutcome::Skip => {}
                ActionOutcome::Stop => {
                    blocks.add(cell);
                }
                ActionOutcome::Continue => {
                    blocks.add(cell);
                    if self.max_depth.map_or(true, |max| depth < max) {
                        for next in cell.neighbors() {
                            if visited.insert(next) {
                                frontier.push_back((next, depth + 1));
                            }
                        }
                    }
                }
            }
        }

        Traversal {
            blocks,
            evaluated,
            truncated: None,
        }
    }
}
