//! Gateway admin API client.

use std::time::Duration;

use async_trait::async_trait;
use migration_control_sdk::{MAX_WEIGHT, MigrationTarget};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::{DomainError, GATEWAY};
use crate::domain::ports::GatewayClient;
use crate::infra::http::{build_client, check, decode, join};

#[derive(Debug, Serialize, Deserialize)]
struct LockBody {
    locked: bool,
}

#[derive(Debug, Serialize)]
struct SetWeightBody<'a> {
    service: &'a str,
    /// Fraction of traffic, 0.0..=1.0.
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct WeightBody {
    weight: f64,
}

pub struct HttpGatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    #[instrument(skip(self), level = "debug")]
    async fn traffic_lock(&self) -> Result<bool, DomainError> {
        let response = self
            .client
            .get(join(&self.base_url, "/admin/traffic-lock"))
            .send()
            .await;
        let body: LockBody = decode(GATEWAY, response).await?;
        Ok(body.locked)
    }

    #[instrument(skip(self), level = "debug")]
    async fn set_traffic_lock(&self, locked: bool) -> Result<bool, DomainError> {
        let response = self
            .client
            .post(join(&self.base_url, "/admin/traffic-lock"))
            .json(&LockBody { locked })
            .send()
            .await;
        let body: LockBody = decode(GATEWAY, response).await?;
        Ok(body.locked)
    }

    #[instrument(skip(self), level = "debug", fields(service = %target))]
    async fn push_weight(&self, target: &MigrationTarget, weight: u8) -> Result<(), DomainError> {
        let response = self
            .client
            .post(join(&self.base_url, "/admin/set-weight"))
            .json(&SetWeightBody {
                service: target.as_str(),
                weight: f64::from(weight) / 100.0,
            })
            .send()
            .await;
        check(GATEWAY, response).await?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug", fields(service = %target))]
    async fn weight(&self, target: &MigrationTarget) -> Result<u8, DomainError> {
        let response = self
            .client
            .get(join(&self.base_url, "/admin/set-weight"))
            .query(&[("service", target.as_str())])
            .send()
            .await;
        let body: WeightBody = decode(GATEWAY, response).await?;
        fraction_to_percent(body.weight)
    }
}

fn fraction_to_percent(fraction: f64) -> Result<u8, DomainError> {
    let percent = (fraction * 100.0).round();
    if !(0.0..=f64::from(MAX_WEIGHT)).contains(&percent) {
        return Err(DomainError::upstream(
            GATEWAY,
            format!("weight {fraction} is outside 0.0..=1.0"),
        ));
    }
    // Range checked above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = percent as u8;
    Ok(percent)
}
