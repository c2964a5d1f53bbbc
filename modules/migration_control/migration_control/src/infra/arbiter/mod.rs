//! Arbiter client.

use std::time::Duration;

use async_trait::async_trait;
use migration_control_sdk::ConsistencyMetrics;
use serde::Deserialize;
use tracing::instrument;

use crate::domain::error::{ARBITER, DomainError};
use crate::domain::ports::ArbiterClient;
use crate::infra::http::{build_client, decode, join};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    consistency_score: f64,
    total_transactions: u64,
    matched_transactions: u64,
    #[serde(default)]
    last_decision: Option<String>,
    #[serde(default)]
    last_decision_time: Option<String>,
}

impl From<StatusData> for ConsistencyMetrics {
    fn from(d: StatusData) -> Self {
        Self {
            consistency_score: d.consistency_score,
            total_transactions: d.total_transactions,
            matched_transactions: d.matched_transactions,
            last_decision: d
                .last_decision
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "none".to_owned()),
            last_decision_time: d.last_decision_time.filter(|s| !s.is_empty()),
        }
    }
}

pub struct HttpArbiterClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpArbiterClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ArbiterClient for HttpArbiterClient {
    #[instrument(skip(self), level = "debug")]
    async fn metrics(&self) -> Result<ConsistencyMetrics, DomainError> {
        let response = self.client.get(join(&self.base_url, "/status")).send().await;
        let envelope: Envelope<StatusData> = decode(ARBITER, response).await?;
        match envelope {
            Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data.into()),
            Envelope { message, .. } => Err(DomainError::upstream(
                ARBITER,
                message.unwrap_or_else(|| "status reported failure".to_owned()),
            )),
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn reset(&self) -> Result<(), DomainError> {
        let response = self.client.post(join(&self.base_url, "/reset")).send().await;
        let envelope: Envelope<serde_json::Value> = decode(ARBITER, response).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(DomainError::upstream(
                ARBITER,
                envelope
                    .message
                    .unwrap_or_else(|| "reset reported failure".to_owned()),
            ))
        }
    }
}
