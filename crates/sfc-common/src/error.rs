//! Error types for SFC translation operations.
//!
//! All errors implement `std::error::Error` via `thiserror`. The
//! taxonomy separates missing references (abort the build, nothing
//! committed), collaborator fetch failures, and commit failures
//! (surface to the lifecycle caller, which owns retry policy).

use std::fmt;

use thiserror::Error;

/// Result type alias for SFC operations.
pub type SfcResult<T> = Result<T, SfcError>;

/// The kind of entity a dangling reference pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Control-plane logical switch row
    LogicalSwitch,
    /// Control-plane logical port row
    LogicalPort,
    /// Control-plane port pair row
    LogicalPortPair,
    /// Control-plane flow classifier row
    LogicalFlowClassifier,
    /// Intent-model port pair group
    PortPairGroup,
    /// Intent-model port pair
    PortPair,
    /// Intent-model flow classifier
    FlowClassifier,
}

impl RefKind {
    /// Returns the kind name used in log and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::LogicalSwitch => "logical switch",
            RefKind::LogicalPort => "logical port",
            RefKind::LogicalPortPair => "logical port pair",
            RefKind::LogicalFlowClassifier => "logical flow classifier",
            RefKind::PortPairGroup => "port pair group",
            RefKind::PortPair => "port pair",
            RefKind::FlowClassifier => "flow classifier",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while translating a chain.
#[derive(Debug, Clone, Error)]
pub enum SfcError {
    /// A referenced entity does not exist in the topology or the
    /// control-plane database at build time.
    #[error("Referenced {kind} not found: {id}")]
    ReferenceNotFound {
        /// What kind of entity was missing.
        kind: RefKind,
        /// The missing entity's identifier.
        id: String,
    },

    /// Northbound database read failed.
    #[error("Northbound operation failed: {operation}: {message}")]
    Database {
        /// The operation that failed (e.g., "find_row").
        operation: String,
        /// Error message.
        message: String,
    },

    /// The transaction failed at commit; nothing was applied.
    #[error("Transaction commit failed: {message}")]
    CommitFailure {
        /// Error message.
        message: String,
    },

    /// An intent-model collaborator fetch failed.
    #[error("Intent-model operation failed: {operation}: {message}")]
    Model {
        /// The operation that failed (e.g., "get_port_pair").
        operation: String,
        /// Error message.
        message: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl SfcError {
    /// Creates a reference-not-found error.
    pub fn reference_not_found(kind: RefKind, id: impl ToString) -> Self {
        Self::ReferenceNotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates a database error.
    pub fn database(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Database {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a commit failure.
    pub fn commit(message: impl Into<String>) -> Self {
        Self::CommitFailure {
            message: message.into(),
        }
    }

    /// Creates an intent-model error.
    pub fn model(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition
    /// that may succeed on retry.
    ///
    /// Missing references are not retryable from this core's point of
    /// view: the topology must change first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SfcError::Database { .. } | SfcError::CommitFailure { .. }
        )
    }
}
