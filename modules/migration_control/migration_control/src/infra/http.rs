//! Shared plumbing for the outbound HTTP clients.

use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::domain::error::DomainError;

pub(crate) fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .context("failed to build HTTP client")
}

pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

pub(crate) fn transport_error(service: &'static str, err: &reqwest::Error) -> DomainError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("request failed: {err}")
    };
    DomainError::upstream(service, message)
}

/// Fail on transport errors and non-2xx answers; the body is left unread.
pub(crate) async fn check(
    service: &'static str,
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<reqwest::Response, DomainError> {
    let response = response.map_err(|e| transport_error(service, &e))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DomainError::upstream(
            service,
            format!("HTTP {status}: {}", body.trim()),
        ));
    }
    Ok(response)
}

/// Check the status and decode a JSON body. Anything but a 2xx with a
/// well-formed body is an unavailable collaborator.
pub(crate) async fn decode<T: DeserializeOwned>(
    service: &'static str,
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, DomainError> {
    check(service, response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| DomainError::upstream(service, format!("invalid response body: {e}")))
}
