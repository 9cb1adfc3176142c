//! Common error infrastructure for bureau-core.
//!
//! Domain-specific errors (e.g. [`PhotocopierError`](crate::photocopier::PhotocopierError))
//! live next to the operations they guard. This module only provides the shared
//! classification used by hosts to decide how loudly to report a failure.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the device is busy; the same request may succeed later
/// - **Validation**: a guard rejected the request; nothing changed
/// - **Internal**: a model invariant was broken, which indicates a bug
/// - **Fatal**: the model cannot be trusted any more
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Retry once the blocking condition clears (e.g. production finished).
    Recoverable,

    /// Invalid request for the current state; do not retry unchanged.
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// State corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all bureau-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BureauError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and tests. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert_eq!(ErrorSeverity::Validation.to_string(), "validation");
    }
}
