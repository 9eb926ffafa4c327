//! Store error types.

use thiserror::Error;

/// Errors produced by table operations and storage backends.
///
/// Every error is terminal for the single call that produced it; the
/// service layer converts all of them into structured failure responses,
/// so none escape to the transport. The `Display` strings are the wire
/// error messages.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested tab does not exist in the store.
    #[error("Sheet '{tab}' not found")]
    TabNotFound {
        /// The missing tab name.
        tab: String,
    },

    /// Key-based lookup matched no row (update/delete).
    #[error("Row not found")]
    RowNotFound,

    /// The request named an operation the dispatcher does not know.
    #[error("Invalid action")]
    UnsupportedOperation {
        /// The unrecognized action name, kept for logging.
        action: String,
    },

    /// The underlying store read or write failed.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// Description of the failure.
        reason: String,
    },
}

impl StoreError {
    /// Creates a `TabNotFound` error.
    #[must_use]
    pub fn tab_not_found(tab: impl Into<String>) -> Self {
        Self::TabNotFound { tab: tab.into() }
    }

    /// Creates an `UnsupportedOperation` error.
    #[must_use]
    pub fn unsupported(action: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            action: action.into(),
        }
    }

    /// Creates a `StoreUnavailable` error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::unavailable(e.to_string())
    }
}

/// Store result type.
pub type StoreResult<T> = Result<T, StoreError>;
