//! Errors returned by battle operations.
//!
//! Every error is raised before any state is touched, so the caller can
//! simply re-prompt.

use crate::attack::TargetingError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, Phase};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("invalid target {index}: out of range or already defeated")]
    InvalidTarget { index: usize },

    #[error("'{attack}' needs a target while {alive} enemies are alive")]
    TargetRequired { attack: String, alive: usize },

    #[error("'{attack}' is on cooldown for {remaining} more turn(s)")]
    AttackOnCooldown { attack: String, remaining: u32 },

    #[error("'{attack}' is not an unlocked attack of this combatant")]
    UnknownAttack { attack: String },

    #[error("operation requires phase {expected}, battle is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("cannot pass while '{attack}' is ready")]
    AttackReady { attack: String },

    #[error("upgrade '{id}' is not among the current offers")]
    UpgradeNotOffered { id: String },

    #[error("skipping the upgrade choice is not allowed")]
    SkipNotAllowed,

    #[error("battle is over ({phase})")]
    BattleOver { phase: Phase },

    #[error("{id} is not the next enemy to act")]
    NotEnemyTurn { id: CombatantId },

    #[error("{remaining} enemy action(s) still pending")]
    EnemyTurnPending { remaining: usize },
}

impl BattleError {
    pub(crate) fn from_targeting(attack: &str, error: TargetingError) -> Self {
        match error {
            TargetingError::InvalidTarget { index } => Self::InvalidTarget { index },
            TargetingError::TargetRequired { alive } => Self::TargetRequired {
                attack: attack.to_owned(),
                alive,
            },
        }
    }
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidTarget { .. }
            | Self::TargetRequired { .. }
            | Self::AttackOnCooldown { .. }
            | Self::AttackReady { .. } => ErrorSeverity::Recoverable,
            Self::UnknownAttack { .. }
            | Self::WrongPhase { .. }
            | Self::UpgradeNotOffered { .. }
            | Self::SkipNotAllowed
            | Self::BattleOver { .. } => ErrorSeverity::Validation,
            Self::NotEnemyTurn { .. } | Self::EnemyTurnPending { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => "BATTLE_INVALID_TARGET",
            Self::TargetRequired { .. } => "BATTLE_TARGET_REQUIRED",
            Self::AttackOnCooldown { .. } => "BATTLE_ATTACK_ON_COOLDOWN",
            Self::UnknownAttack { .. } => "BATTLE_UNKNOWN_ATTACK",
            Self::WrongPhase { .. } => "BATTLE_WRONG_PHASE",
            Self::AttackReady { .. } => "BATTLE_ATTACK_READY",
            Self::UpgradeNotOffered { .. } => "BATTLE_UPGRADE_NOT_OFFERED",
            Self::SkipNotAllowed => "BATTLE_SKIP_NOT_ALLOWED",
            Self::BattleOver { .. } => "BATTLE_OVER",
            Self::NotEnemyTurn { .. } => "BATTLE_NOT_ENEMY_TURN",
            Self::EnemyTurnPending { .. } => "BATTLE_ENEMY_TURN_PENDING",
        }
    }
}
