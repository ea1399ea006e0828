#![forbid(unsafe_code)]
//! Fill spell built on the voxel engine
//!
//! `FillSpell` turns a caster's aim and a set of `FillParameters` into one of
//! three edits: paint a cell, flood-replace a body of material, or queue a
//! validated box fill after a two-cast selection. Completed edits are handed
//! to an `UndoSink`.

pub mod caster;
pub mod config;
pub mod error;
pub mod fill;
pub mod outcome;
pub mod session;
pub mod undo;

pub use caster::{Caster, CasterId, CasterProfile, ProtectedRegion};
pub use config::{BatchConfig, FillConfig, FillMode, FillParameters, SpellConfig, UndoConfig};
pub use error::{ConfigError, SpellError};
pub use fill::{apply_batches, CastEnv, FillSpell};
pub use outcome::{CancelOutcome, CastOutcome};
pub use session::{PendingFill, SessionStore};
pub use undo::{UndoQueue, UndoSink};
