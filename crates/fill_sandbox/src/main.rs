//! Scripted fill spell session against two small flat worlds
//!
//! Usage: `fill-sandbox [config.json]`. Set `RUST_LOG=debug` for the
//! per-transition events.

use anyhow::Context;
use glam::IVec3;
use spell_engine::{
    apply_batches, CastEnv, CastOutcome, CasterProfile, FillMode, FillParameters, FillSpell,
    ProtectedRegion, SpellConfig, SpellError, UndoQueue,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use voxel_engine::{
    batch_channel, BatchProcessor, BatchSender, Material, OwnerId, RaycastTargeting, Voxel,
    VoxelWorld, WorldId, WorldSet,
};

const WORLD: WorldId = WorldId(0);
const FLAT: WorldId = WorldId(1);
const FLOOR_RADIUS: i32 = 32;

/// World `id` with a stone layer at y = -1 and `top` at y = 0
fn flat_world(id: WorldId, top: Material) -> VoxelWorld {
    let mut world = VoxelWorld::with_height(id, -64, 255);
    world.fill_box(
        IVec3::new(-FLOOR_RADIUS, -1, -FLOOR_RADIUS),
        IVec3::new(FLOOR_RADIUS, -1, FLOOR_RADIUS),
        Voxel::new(Material::Stone, 0),
    );
    world.fill_box(
        IVec3::new(-FLOOR_RADIUS, 0, -FLOOR_RADIUS),
        IVec3::new(FLOOR_RADIUS, 0, FLOOR_RADIUS),
        Voxel::new(top, 0),
    );
    world.take_dirty_chunks();
    world
}

struct Sandbox {
    worlds: WorldSet,
    undo: UndoQueue,
    sender: BatchSender,
    processor: BatchProcessor,
    spell: FillSpell,
}

impl Sandbox {
    fn new(config: &SpellConfig) -> Self {
        let mut worlds = WorldSet::new();
        worlds.insert(flat_world(WORLD, Material::Grass));
        worlds.insert(flat_world(FLAT, Material::Sand));

        let (sender, processor) = batch_channel(config.batches.cells_per_tick);
        Self {
            worlds,
            undo: UndoQueue::new(config.undo.max_entries),
            sender,
            processor,
            spell: FillSpell::new(config.fill.clone()),
        }
    }

    fn cast(&mut self, caster: &CasterProfile, params: &FillParameters) {
        let mut env = CastEnv {
            store: &mut self.worlds,
            targeting: &RaycastTargeting,
            undo: &mut self.undo,
            batches: &self.sender,
        };
        report(self.spell.cast(&mut env, caster, params));
    }

    /// Tick the batch processor until every queued fill is applied
    fn drain(&mut self) -> usize {
        let mut ticks = 0;
        while self.processor.pending() > 0 {
            ticks += 1;
            for id in apply_batches(&mut self.processor, &mut self.worlds, &mut self.undo) {
                tracing::info!(batch = id.0, ticks, "batch finished");
            }
        }
        ticks
    }

    fn dirty_chunks(&self, id: WorldId) -> usize {
        self.worlds
            .get(id)
            .map_or(0, |w| w.dirty_regions().dirty_count())
    }
}

fn report(result: Result<CastOutcome, SpellError>) {
    match result {
        Ok(outcome) => tracing::info!("{outcome}"),
        Err(err) => tracing::warn!("{err}"),
    }
}

fn look_at(caster: &mut CasterProfile, cell: IVec3) {
    caster.look_down_at(cell, 6.0);
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config/spells.json"));
    let config = SpellConfig::load_or_default(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let mut sandbox = Sandbox::new(&config);
    let mut caster = CasterProfile::new(OwnerId(1), WORLD);
    caster.protect(ProtectedRegion::new(
        WORLD,
        IVec3::new(20, -1, 20),
        IVec3::new(FLOOR_RADIUS, 0, FLOOR_RADIUS),
    ));

    // Two-cast box fill
    let planks = FillParameters::with_mode(FillMode::Box).material(Material::Planks);
    look_at(&mut caster, IVec3::ZERO);
    sandbox.cast(&caster, &planks);
    look_at(&mut caster, IVec3::new(9, 0, 9));
    sandbox.cast(&caster, &planks);
    let ticks = sandbox.drain();
    tracing::info!(ticks, "box fill drained");

    // Flood the grass around a point, out to the configured depth
    let gravel = FillParameters::with_mode(FillMode::Recurse).material(Material::Gravel);
    look_at(&mut caster, IVec3::new(-10, 0, -10));
    sandbox.cast(&caster, &gravel);

    let glass = FillParameters::with_mode(FillMode::Single).material(Material::Glass);
    look_at(&mut caster, IVec3::new(-3, 0, 4));
    sandbox.cast(&caster, &glass);

    // Selection then cancel, twice
    look_at(&mut caster, IVec3::new(0, 0, -5));
    sandbox.cast(&caster, &FillParameters::default());
    for _ in 0..2 {
        tracing::info!("{}", sandbox.spell.cancel(caster.id));
    }

    // 25 x 25 is over the default volume limit
    look_at(&mut caster, IVec3::new(-12, 0, -12));
    sandbox.cast(&caster, &planks);
    look_at(&mut caster, IVec3::new(12, 0, 12));
    sandbox.cast(&caster, &planks);

    // Inside the protected corner
    look_at(&mut caster, IVec3::new(25, 0, 25));
    sandbox.cast(&caster, &glass);

    // Box armed in one world and confirmed from another fills the first
    look_at(&mut caster, IVec3::new(-6, 0, 2));
    sandbox.cast(&caster, &glass);
    caster.world = FLAT;
    look_at(&mut caster, IVec3::new(-4, 0, 4));
    sandbox.cast(&caster, &glass);
    sandbox.drain();
    caster.world = WORLD;

    tracing::info!(
        dirty_chunks = sandbox.dirty_chunks(WORLD),
        other_dirty_chunks = sandbox.dirty_chunks(FLAT),
        undo_depth = sandbox.undo.depth(caster.id),
        "edits applied"
    );

    while let Some(restored) = sandbox.undo.undo(caster.id, &mut sandbox.worlds) {
        tracing::info!(restored, "undone");
    }

    Ok(())
}
