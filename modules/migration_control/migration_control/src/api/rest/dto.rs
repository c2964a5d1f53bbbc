//! REST DTOs for migration control.

use migration_control_sdk::{
    ControlAction, DeploymentRecord, DeploymentResult, DeploymentStatus, MigrationStatus,
    Subsystem, TrafficAction, TrafficGeneratorStats, TrafficProfile, WeightChange, WeightRecord,
};
use serde::{Deserialize, Serialize};

// === Health ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_owned(),
        }
    }
}

// === Weight and control ===

#[derive(Debug, Clone, Deserialize)]
pub struct TargetQuery {
    pub target: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetWeightRequest {
    pub target: String,
    /// Percent; range is checked by the controller so the error names the field.
    pub weight: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightChangeDto {
    pub target: String,
    pub weight: u8,
    pub active: bool,
    pub gateway_synced: bool,
}

impl From<WeightChange> for WeightChangeDto {
    fn from(change: WeightChange) -> Self {
        Self {
            target: change.record.target.to_string(),
            weight: change.record.weight,
            active: change.record.active,
            gateway_synced: change.gateway_synced.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlRequest {
    pub target: String,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlResponse {
    pub success: bool,
    pub target: String,
    pub weight: u8,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_synced: Option<bool>,
}

impl From<WeightChange> for ControlResponse {
    fn from(change: WeightChange) -> Self {
        Self {
            success: true,
            target: change.record.target.to_string(),
            weight: change.record.weight,
            active: change.record.active,
            gateway_synced: change.gateway_synced,
        }
    }
}

// === Traffic lock ===

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrafficLockDto {
    pub locked: bool,
}

// === Status ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_weight: Option<u8>,
    pub targets: Vec<WeightRecord>,
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_lock: Option<bool>,
    pub consistency_score: f64,
    pub total_transactions: u64,
    pub matched_transactions: u64,
    pub last_decision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_decision_time: Option<String>,
    pub deployment: Option<DeploymentRecord>,
    pub degraded: Vec<Subsystem>,
}

impl From<MigrationStatus> for StatusDto {
    fn from(status: MigrationStatus) -> Self {
        let requested = status.requested_record().cloned();
        Self {
            target: status.requested.as_ref().map(ToString::to_string),
            weight: requested.as_ref().map(|r| r.weight),
            active: requested.as_ref().map(|r| r.active),
            gateway_weight: status.gateway_weight,
            targets: status.targets,
            locked: status.lock.locked,
            last_known_lock: status.last_known_lock,
            consistency_score: status.consistency.consistency_score,
            total_transactions: status.consistency.total_transactions,
            matched_transactions: status.consistency.matched_transactions,
            last_decision: status.consistency.last_decision,
            last_decision_time: status.consistency.last_decision_time,
            deployment: status.deployment,
            degraded: status.degraded,
        }
    }
}

// === Synthetic traffic ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficRequest {
    pub action: TrafficAction,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub profile: Option<TrafficProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficResponse {
    pub message: String,
    pub stats: TrafficGeneratorStats,
}

// === Deployment lifecycle ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStartRequest {
    pub migration_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResultRequest {
    pub migration_id: String,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub legacy: DeploymentResult,
    #[serde(default)]
    pub modern: DeploymentResult,
    #[serde(default)]
    pub message: String,
}

// === Arbiter ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbiterResetResponse {
    pub success: bool,
    pub message: String,
}
