//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (`BattleError`, `CatalogError`, `AttackDataError`)
//! live next to the code that produces them. This module provides the shared
//! severity classification and the [`GameError`] trait they all implement.
//!
//! # Design Principles
//!
//! - **Expected outcomes are values**: misses, self-KOs and skipped turns are
//!   reported through result types, never through errors
//! - **No mutation on failure**: every `Validation`/`Recoverable` error is
//!   raised before any combatant is touched
//! - **Severity Classification**: errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller can retry with a different choice (re-prompt)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: a data-model invariant was violated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retry with an alternative choice.
    ///
    /// Examples: target already dead, attack still on cooldown
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown attack name, upgrade that was never offered
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - battle state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization and testing. Default implementation
    /// uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
