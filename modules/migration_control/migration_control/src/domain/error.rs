//! Domain errors for migration control.

use migration_control_sdk::MigrationError;
use thiserror::Error;

/// Collaborator names used in `UpstreamUnavailable` errors and logs.
pub const GATEWAY: &str = "gateway";
pub const ARBITER: &str = "arbiter";
pub const DEPLOYMENT_STORE: &str = "deployment_store";

#[derive(Error, Debug)]
pub enum DomainError {
    /// Request names a target outside the configured set.
    #[error("unknown migration target '{target}'")]
    UnknownTarget { target: String },

    /// Validation error.
    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// Collaborator unreachable, timed out, or answered with garbage.
    #[error("{service} unavailable: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// Storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

impl From<DomainError> for MigrationError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnknownTarget { target } => {
                Self::invalid_argument("target", format!("unknown migration target '{target}'"))
            }
            DomainError::Validation { field, message } => Self::invalid_argument(field, message),
            DomainError::Upstream { service, message } => {
                Self::upstream_unavailable(service, message)
            }
            DomainError::Storage(err) => Self::internal(err.to_string()),
        }
    }
}
