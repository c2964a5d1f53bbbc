//! REST error mapping for migration control.

use cutover_errors::Problem;
use http::StatusCode;

use crate::domain::error::DomainError;

/// Convert `DomainError` to Problem for REST responses.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let trace_id = tracing::Span::current()
            .id()
            .map(|id| id.into_u64().to_string());

        let (status, code, title, detail, field) = match &e {
            DomainError::UnknownTarget { target } => (
                StatusCode::BAD_REQUEST,
                "MIGRATION_INVALID_ARGUMENT",
                "Invalid argument",
                format!("Unknown migration target '{target}'"),
                Some(("target", "not a configured migration target".to_owned())),
            ),
            DomainError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "MIGRATION_INVALID_ARGUMENT",
                "Invalid argument",
                format!("{field}: {message}"),
                Some((field.as_str(), message.clone())),
            ),
            DomainError::Upstream { service, message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "MIGRATION_UPSTREAM_UNAVAILABLE",
                "Upstream unavailable",
                format!("{service} unavailable: {message}"),
                None,
            ),
            DomainError::Storage(_) => {
                tracing::error!(error = ?e, "Storage error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MIGRATION_INTERNAL",
                    "Internal Server Error",
                    "An internal error occurred".to_owned(),
                    None,
                )
            }
        };

        let mut problem = Problem::new(status, title, detail).with_code(code);
        if let Some((name, reason)) = field {
            problem = problem.with_field(name, reason);
        }
        if let Some(id) = trace_id {
            problem = problem.with_trace_id(id);
        }
        problem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{ARBITER, GATEWAY};

    #[test]
    fn unknown_target_is_bad_request() {
        let problem = Problem::from(DomainError::UnknownTarget {
            target: "java".to_owned(),
        });

        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.code, "MIGRATION_INVALID_ARGUMENT");
        assert_eq!(problem.fields[0].field, "target");
        assert!(problem.detail.contains("java"));
    }

    #[test]
    fn validation_names_the_field() {
        let problem = Problem::from(DomainError::validation("weight", "must be between 0 and 100, got 101"));

        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.fields[0].field, "weight");
        assert_eq!(problem.type_url, "https://errors.cutover.dev/MIGRATION_INVALID_ARGUMENT");
    }

    #[test]
    fn upstream_is_service_unavailable() {
        let gateway = Problem::from(DomainError::upstream(GATEWAY, "connection refused"));
        let arbiter = Problem::from(DomainError::upstream(ARBITER, "timeout"));

        assert_eq!(gateway.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(gateway.code, "MIGRATION_UPSTREAM_UNAVAILABLE");
        assert!(gateway.detail.starts_with("gateway unavailable"));
        assert!(arbiter.detail.starts_with("arbiter unavailable"));
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let problem = Problem::from(DomainError::Storage(anyhow::anyhow!("disk full at /var/lib")));

        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.code, "MIGRATION_INTERNAL");
        assert!(!problem.detail.contains("/var/lib"));
    }
}
