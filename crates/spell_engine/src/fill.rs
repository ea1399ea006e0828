//! The fill spell
//!
//! Three modes share one entry point:
//! - `single` paints the targeted cell
//! - `recurse` flood-replaces the targeted body of material
//! - box (the default) is two-phase: the first cast arms a corner, the second
//!   validates the box and hands it to the batch queue
//!
//! Every mode resolves the target and checks permission before anything else;
//! those failures leave both the world and the caster's selection untouched.

use crate::caster::{Caster, CasterId};
use crate::config::{FillConfig, FillMode, FillParameters};
use crate::error::SpellError;
use crate::outcome::{CancelOutcome, CastOutcome};
use crate::session::{PendingFill, SessionStore};
use crate::undo::UndoSink;
use voxel_engine::{
    BatchId, BatchProcessor, BatchSink, BlockList, BlockRecurse, CellRef, CellStore, DataValue,
    FillBatch, Material, ReplaceMaterialAction, Targeting,
};

/// Collaborators a cast reads from and writes to
pub struct CastEnv<'a> {
    pub store: &'a mut dyn CellStore,
    pub targeting: &'a dyn Targeting,
    pub undo: &'a mut dyn UndoSink,
    pub batches: &'a dyn BatchSink,
}

/// Fill spell shared by all casters; pending selections are kept per caster
#[derive(Debug, Default)]
pub struct FillSpell {
    config: FillConfig,
    sessions: SessionStore,
}

impl FillSpell {
    pub fn new(config: FillConfig) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
        }
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    pub fn is_armed(&self, caster: CasterId) -> bool {
        self.sessions.is_armed(caster)
    }

    pub fn pending(&self, caster: CasterId) -> Option<&PendingFill> {
        self.sessions.get(caster)
    }

    pub fn cast(
        &mut self,
        env: &mut CastEnv<'_>,
        caster: &dyn Caster,
        params: &FillParameters,
    ) -> Result<CastOutcome, SpellError> {
        let id = caster.id();
        let aim = caster.aim();

        let Some(hit) = env
            .targeting
            .resolve(&*env.store, &aim, &self.config.see_through)
        else {
            tracing::debug!(caster = id.0, "fill cast found no target");
            return Err(SpellError::NoTarget);
        };
        let target = hit.cell;

        if !caster.has_build_permission(&target) {
            tracing::debug!(caster = id.0, position = ?target.position, "fill cast denied");
            return Err(SpellError::InsufficientPermission);
        }

        // An explicit material always carries data 0
        let material_override = params
            .material
            .map(|m| (m, 0))
            .or_else(|| caster.building_material());

        match params.mode {
            FillMode::Recurse => {
                self.sessions.clear(id);
                let (material, data) = material_override.unwrap_or((Material::Air, 0));
                let size = params.recursion_size(&self.config);
                let depth = (size as f32 * caster.radius_multiplier()).max(0.0) as u32;
                let recurse =
                    BlockRecurse::new(params.visit_cap(&self.config)).with_max_depth(depth);
                Ok(Self::flood(env, id, target, material, data, &recurse))
            }
            FillMode::Single => {
                self.sessions.clear(id);
                let (material, data) = material_override.unwrap_or((Material::Air, 0));
                Self::paint(env, id, target, material, data)
            }
            FillMode::Box => match self.sessions.take(id) {
                None => Ok(self.arm(id, target, material_override)),
                Some(pending) => {
                    let (material, data) = material_override
                        .unwrap_or((pending.origin.material, pending.origin.data));
                    let limits = params
                        .limits(&self.config)
                        .scaled(caster.construction_multiplier());

                    let fill = FillBatch::new(pending.origin, target, material, data, id)
                        .validate(&limits)
                        .map_err(|err| {
                            tracing::info!(caster = id.0, %err, "box fill rejected");
                            err
                        })?;

                    let volume = fill.volume();
                    let batch = env.batches.enqueue(fill)?;
                    tracing::info!(caster = id.0, batch = batch.0, volume, %material, "box fill queued");
                    Ok(CastOutcome::Queued {
                        batch,
                        material,
                        volume,
                    })
                }
            },
        }
    }

    /// Drop the caster's pending selection. Batches already queued are not
    /// affected.
    pub fn cancel(&mut self, caster: CasterId) -> CancelOutcome {
        if self.sessions.clear(caster) {
            tracing::debug!(caster = caster.0, "pending fill cancelled");
            CancelOutcome::Cancelled
        } else {
            CancelOutcome::NothingToCancel
        }
    }

    fn arm(
        &mut self,
        id: CasterId,
        target: CellRef,
        material_override: Option<(Material, DataValue)>,
    ) -> CastOutcome {
        let material = material_override.map_or(target.material, |(m, _)| m);
        self.sessions.arm(id, PendingFill { origin: target });
        tracing::debug!(caster = id.0, position = ?target.position, %material, "box fill armed");
        CastOutcome::Armed {
            origin: target,
            material,
            highlight: target.center(),
        }
    }

    fn flood(
        env: &mut CastEnv<'_>,
        id: CasterId,
        target: CellRef,
        material: Material,
        data: DataValue,
        recurse: &BlockRecurse,
    ) -> CastOutcome {
        let mut action = ReplaceMaterialAction::for_origin(&target, material, data);
        let traversal = recurse.recurse(
            &mut *env.store,
            target.world,
            target.position,
            &mut action,
        );

        let count = traversal.blocks.len();
        tracing::info!(
            caster = id.0,
            count,
            truncated = traversal.is_truncated(),
            %material,
            "flood fill applied"
        );
        env.undo.register(id, traversal.blocks);

        CastOutcome::Filled {
            count,
            material,
            truncated: traversal.truncated,
        }
    }

    fn paint(
        env: &mut CastEnv<'_>,
        id: CasterId,
        target: CellRef,
        material: Material,
        data: DataValue,
    ) -> Result<CastOutcome, SpellError> {
        if !env
            .store
            .set_cell(target.world, target.position, material, data)
        {
            return Err(SpellError::NoTarget);
        }
        let mut blocks = BlockList::with_capacity(1);
        blocks.add(target);
        env.undo.register(id, blocks);

        tracing::debug!(caster = id.0, position = ?target.position, %material, "cell painted");
        Ok(CastOutcome::Painted {
            material,
            position: target.position,
        })
    }
}

/// Advance queued box fills by one tick and hand every finished batch's
/// record to `undo`. Returns the ids of the batches that finished.
pub fn apply_batches(
    processor: &mut BatchProcessor,
    store: &mut dyn CellStore,
    undo: &mut dyn UndoSink,
) -> Vec<BatchId> {
    processor
        .tick(store)
        .into_iter()
        .map(|done| {
            undo.register(done.owner, done.blocks);
            done.id
        })
        .collect()
}
