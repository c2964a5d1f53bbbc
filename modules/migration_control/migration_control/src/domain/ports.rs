//! Output ports (interfaces) for the collaborators the controller talks to.

use async_trait::async_trait;
use migration_control_sdk::{ConsistencyMetrics, MigrationTarget, TrafficMethod};
use serde_json::Value;

use super::error::DomainError;

/// Admin surface of the Gateway (data plane).
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Lock flag as currently enforced by the Gateway.
    async fn traffic_lock(&self) -> Result<bool, DomainError>;

    /// Ask the Gateway to lock or unlock. Returns the acknowledged flag.
    async fn set_traffic_lock(&self, locked: bool) -> Result<bool, DomainError>;

    /// Forward a weight, in percent, for `target`.
    async fn push_weight(&self, target: &MigrationTarget, weight: u8) -> Result<(), DomainError>;

    /// Weight the Gateway currently applies to `target`, in percent.
    async fn weight(&self, target: &MigrationTarget) -> Result<u8, DomainError>;
}

/// Read and reset surface of the Arbiter.
#[async_trait]
pub trait ArbiterClient: Send + Sync {
    async fn metrics(&self) -> Result<ConsistencyMetrics, DomainError>;

    async fn reset(&self) -> Result<(), DomainError>;
}

/// Outcome of one synthetic request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The endpoint answered with this HTTP status.
    Status(u16),
    /// No response (connection refused, timeout, ...).
    Failed(String),
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Status(code) if (200..300).contains(code))
    }
}

/// Sends synthetic requests on behalf of the traffic generator.
#[async_trait]
pub trait TrafficTransport: Send + Sync {
    async fn send(&self, url: &str, method: TrafficMethod, body: &Value) -> SendOutcome;
}
