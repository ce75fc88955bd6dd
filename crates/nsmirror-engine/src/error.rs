//! Engine error types.

use nsmirror_storage::StoreError;

/// Errors that can occur while reconciling one watch event.
///
/// All variants are recoverable at the event level: the run loop reports
/// them and continues with the next event. Only configuration problems
/// (handled in the server crate) are fatal.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The target slot is occupied by a secret this engine does not own.
    #[error(
        "not overriding existing secret {target_namespace}/{name}: missing or foreign ownership marker"
    )]
    NotOverridable {
        /// Name of the occupied slot.
        name: String,
        /// Namespace of the occupied slot.
        target_namespace: String,
    },

    /// An additional secret named by the group is absent from the source
    /// namespace during an upsert.
    #[error("no such secret in {source_namespace}: {name}")]
    MissingDependency {
        /// Name of the missing secret.
        name: String,
        /// Namespace it was expected in.
        source_namespace: String,
    },

    /// The event carried an operation type this engine does not understand.
    #[error("unrecognized watch operation: {op}")]
    UnrecognizedOperation {
        /// Wire form of the operation.
        op: String,
    },

    /// A store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Creates a new `NotOverridable` error.
    #[must_use]
    pub fn not_overridable(name: impl Into<String>, target_namespace: impl Into<String>) -> Self {
        Self::NotOverridable {
            name: name.into(),
            target_namespace: target_namespace.into(),
        }
    }

    /// Creates a new `MissingDependency` error.
    #[must_use]
    pub fn missing_dependency(
        name: impl Into<String>,
        source_namespace: impl Into<String>,
    ) -> Self {
        Self::MissingDependency {
            name: name.into(),
            source_namespace: source_namespace.into(),
        }
    }

    /// Creates a new `UnrecognizedOperation` error.
    #[must_use]
    pub fn unrecognized_operation(op: impl Into<String>) -> Self {
        Self::UnrecognizedOperation { op: op.into() }
    }

    /// Returns `true` if this is an ownership guard rejection.
    #[must_use]
    pub fn is_not_overridable(&self) -> bool {
        matches!(self, Self::NotOverridable { .. })
    }

    /// Returns `true` if this is a missing-dependency failure.
    #[must_use]
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::not_overridable("cfg", "dst");
        assert_eq!(
            err.to_string(),
            "not overriding existing secret dst/cfg: missing or foreign ownership marker"
        );

        let err = EngineError::missing_dependency("extra", "src");
        assert_eq!(err.to_string(), "no such secret in src: extra");

        let err = EngineError::unrecognized_operation("BOOKMARK");
        assert_eq!(err.to_string(), "unrecognized watch operation: BOOKMARK");
    }

    #[test]
    fn test_store_error_passthrough() {
        let err: EngineError = StoreError::connection_error("refused").into();
        assert!(matches!(err, EngineError::Store(_)));
        assert_eq!(err.to_string(), "Connection error: refused");
    }

    #[test]
    fn test_predicates() {
        assert!(EngineError::not_overridable("cfg", "dst").is_not_overridable());
        assert!(!EngineError::not_overridable("cfg", "dst").is_missing_dependency());
        assert!(EngineError::missing_dependency("x", "src").is_missing_dependency());
    }
}
