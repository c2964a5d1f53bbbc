//! reqwest transport for synthetic traffic.

use std::time::Duration;

use async_trait::async_trait;
use migration_control_sdk::TrafficMethod;
use serde_json::Value;

use crate::domain::ports::{SendOutcome, TrafficTransport};
use crate::infra::http::build_client;

pub struct HttpTrafficTransport {
    client: reqwest::Client,
}

impl HttpTrafficTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl TrafficTransport for HttpTrafficTransport {
    async fn send(&self, url: &str, method: TrafficMethod, body: &Value) -> SendOutcome {
        let request = match method {
            TrafficMethod::Post => self.client.post(url).json(body),
            TrafficMethod::Put => self.client.put(url).json(body),
            // GET carries the payload fields as query parameters.
            TrafficMethod::Get => self.client.get(url).query(body),
        };

        match request.send().await {
            Ok(response) => SendOutcome::Status(response.status().as_u16()),
            Err(err) => SendOutcome::Failed(err.to_string()),
        }
    }
}
