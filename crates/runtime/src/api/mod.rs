//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod advisory;
pub mod errors;
pub mod handle;
pub mod presentation;

pub use advisory::{AdvisedEnemyStrategy, AdvisoryPolicy};
pub use errors::{AdvisoryError, Result, RuntimeError};
pub use handle::BattleHandle;
pub use presentation::{PresentationSink, TracingSink};
