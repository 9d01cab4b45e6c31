//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule violations from the engine and failures of worker coordination
//! so clients can bubble them up with consistent context.
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{BattleError, CatalogError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a catalog before starting a battle")]
    MissingCatalog,

    #[error("invalid battle catalog")]
    Catalog(#[source] CatalogError),
}

impl RuntimeError {
    /// The engine error behind this failure, if any.
    pub fn as_battle(&self) -> Option<&BattleError> {
        match self {
            Self::Battle(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the caller can simply re-prompt and try again.
    pub fn is_recoverable(&self) -> bool {
        self.as_battle().is_some_and(|error| {
            matches!(
                error.severity(),
                ErrorSeverity::Recoverable | ErrorSeverity::Validation
            )
        })
    }
}

/// Why an advisory policy produced no usable choice.
///
/// Advisory failures never reach the caller; the worker logs them and falls
/// back to the default enemy strategy.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory policy timed out after {0:?}")]
    Timeout(Duration),

    #[error("advice '{0}' does not name a ready attack")]
    ParseFailure(String),

    #[error("failed to encode battle snapshot")]
    Snapshot(#[from] serde_json::Error),

    #[error("advisory policy failed: {0}")]
    Provider(String),
}
