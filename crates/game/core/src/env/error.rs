//! Catalog lookup errors.

use crate::attack::AttackDataError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::ArchetypeId;

/// Errors raised while looking up or validating catalog data.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// No moveset is registered for the archetype. Callers of
    /// [`AttackOracle::attacks_for`](super::AttackOracle::attacks_for) never see
    /// this; they get the `Default` moveset instead.
    #[error("no moveset registered for archetype '{0}'")]
    UnknownArchetype(ArchetypeId),

    #[error("attack '{name}' not found in the moveset of '{archetype}'")]
    AttackNotFound { archetype: ArchetypeId, name: String },

    #[error("upgrade '{0}' not found")]
    UpgradeNotFound(String),

    #[error("duplicate upgrade id '{0}'")]
    DuplicateUpgrade(String),

    #[error("invalid attack in moveset of '{archetype}': {source}")]
    InvalidAttack {
        archetype: ArchetypeId,
        #[source]
        source: AttackDataError,
    },

    #[error("moveset of '{0}' is empty")]
    EmptyMoveset(ArchetypeId),
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownArchetype(_) => ErrorSeverity::Recoverable,
            Self::AttackNotFound { .. } | Self::UpgradeNotFound(_) => ErrorSeverity::Validation,
            Self::DuplicateUpgrade(_) | Self::InvalidAttack { .. } | Self::EmptyMoveset(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownArchetype(_) => "CATALOG_UNKNOWN_ARCHETYPE",
            Self::AttackNotFound { .. } => "CATALOG_ATTACK_NOT_FOUND",
            Self::UpgradeNotFound(_) => "CATALOG_UPGRADE_NOT_FOUND",
            Self::DuplicateUpgrade(_) => "CATALOG_DUPLICATE_UPGRADE",
            Self::InvalidAttack { .. } => "CATALOG_INVALID_ATTACK",
            Self::EmptyMoveset(_) => "CATALOG_EMPTY_MOVESET",
        }
    }
}
