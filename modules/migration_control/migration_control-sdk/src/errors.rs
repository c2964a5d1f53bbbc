//! Error taxonomy of the migration control plane.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// Malformed or out-of-range input. Rejected before any state is touched.
    #[error("invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    /// Gateway, Arbiter or the deployment document could not be reached in time.
    #[error("{service} unavailable: {message}")]
    UpstreamUnavailable { service: String, message: String },

    /// A write that contradicts newer recorded state.
    #[error("state conflict: {message}")]
    StateConflict { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl MigrationError {
    #[must_use]
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn upstream_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn state_conflict(message: impl Into<String>) -> Self {
        Self::StateConflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
