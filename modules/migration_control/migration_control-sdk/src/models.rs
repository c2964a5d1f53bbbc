//! Model types shared between the migration control module and its consumers.
//!
//! Wire names are camelCase to match the dashboard and the deployment
//! orchestrator that read and write these documents.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound of a traffic weight, in percent.
pub const MAX_WEIGHT: u8 = 100;

/// Logical service undergoing a legacy-to-modern migration, e.g. `python`.
///
/// Construction does not validate membership in the configured target set;
/// the controller rejects unknown targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationTarget(String);

impl MigrationTarget {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MigrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Traffic weight and activity flag of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightRecord {
    pub target: MigrationTarget,
    /// Percentage of traffic intended for the modern implementation (0..=100).
    pub weight: u8,
    pub active: bool,
}

impl WeightRecord {
    /// State of a target that was never written: zero weight, inactive.
    #[must_use]
    pub fn inactive(target: MigrationTarget) -> Self {
        Self {
            target,
            weight: 0,
            active: false,
        }
    }
}

/// Result of a weight-mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightChange {
    pub record: WeightRecord,
    /// Whether the Gateway acknowledged the new weight. `None` when no push
    /// was attempted (weight unchanged or pushing disabled).
    pub gateway_synced: Option<bool>,
}

/// Global traffic lock. Defaults to locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLockState {
    pub locked: bool,
}

impl Default for TrafficLockState {
    fn default() -> Self {
        Self { locked: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    #[default]
    Idle,
    Deploying,
    Success,
    Error,
}

impl DeploymentStatus {
    /// `success` and `error` end a migration attempt.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Deploying => "deploying",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Provisioning result of one side (legacy or modern) of a migration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

/// Latest migration attempt as persisted in the deployment status document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub migration_id: String,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub legacy: DeploymentResult,
    #[serde(default)]
    pub modern: DeploymentResult,
    #[serde(default)]
    pub message: String,
    /// Milliseconds since the Unix epoch on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a lifecycle write.
///
/// A write that was not applied still carries the submitted record, with the
/// reason prepended to its `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub applied: bool,
    pub record: DeploymentRecord,
}

/// Consistency metrics published by the Arbiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyMetrics {
    /// Share of matched transactions, 0..=100.
    pub consistency_score: f64,
    pub total_transactions: u64,
    pub matched_transactions: u64,
    pub last_decision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_decision_time: Option<String>,
}

impl ConsistencyMetrics {
    /// Substitute used while the Arbiter is unreachable: a perfect score over
    /// zero transactions.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            consistency_score: 100.0,
            total_transactions: 0,
            matched_transactions: 0,
            last_decision: "none".to_owned(),
            last_decision_time: None,
        }
    }
}

impl Default for ConsistencyMetrics {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Collaborator whose data is missing from a status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Gateway,
    Arbiter,
    Deployment,
}

/// Aggregated view of the control plane.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationStatus {
    /// Target the snapshot was requested for, if any.
    pub requested: Option<MigrationTarget>,
    /// One record per reported target (only the requested one when set).
    pub targets: Vec<WeightRecord>,
    /// Weight the Gateway reports for the requested target, in percent.
    pub gateway_weight: Option<u8>,
    pub lock: TrafficLockState,
    /// Lock flag last reflected locally, `None` if never observed. Stays
    /// at its previous value when the Gateway read fails.
    pub last_known_lock: Option<bool>,
    pub consistency: ConsistencyMetrics,
    pub deployment: Option<DeploymentRecord>,
    /// Sub-systems that failed and were replaced by their documented default.
    pub degraded: Vec<Subsystem>,
}

impl MigrationStatus {
    /// Record of the requested target, if one was requested.
    #[must_use]
    pub fn requested_record(&self) -> Option<&WeightRecord> {
        let target = self.requested.as_ref()?;
        self.targets.iter().find(|r| &r.target == target)
    }

    #[must_use]
    pub fn is_degraded(&self, subsystem: Subsystem) -> bool {
        self.degraded.contains(&subsystem)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficAction {
    Start,
    Stop,
}

/// How synthetic traffic is handled by the Gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficMode {
    /// Sent to both implementations; the caller only sees the legacy answer.
    #[default]
    Shadow,
    /// Sent to whichever implementation the weight selects.
    Split,
}

impl TrafficMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shadow => "shadow",
            Self::Split => "split",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrafficMethod {
    #[default]
    Post,
    Put,
    Get,
}

/// Body parameter of an analysed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Shape of the synthetic request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PayloadProfile {
    /// Money transfer between accounts `ACC001..` drawn from a fixed pool.
    #[serde(rename_all = "camelCase")]
    Transfer {
        account_pool: u16,
        min_amount: u32,
        max_amount: u32,
    },
    /// Values synthesized per parameter from its name and type.
    Parameters { parameters: Vec<ParameterSpec> },
}

impl Default for PayloadProfile {
    fn default() -> Self {
        Self::Transfer {
            account_pool: 10,
            min_amount: 10,
            max_amount: 109,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrafficProfile {
    pub mode: TrafficMode,
    pub method: TrafficMethod,
    pub payload: PayloadProfile,
}

/// Cumulative counters of the synthetic traffic generator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficGeneratorStats {
    pub running: bool,
    pub requests_sent: u64,
    pub requests_succeeded: u64,
    pub requests_failed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TrafficMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_record_reads_orchestrator_document() {
        let json = r#"{
            "status": "success",
            "migrationId": "m1",
            "legacy": { "success": true, "url": "http://localhost:9001", "containerName": "legacy-m1", "port": 9001, "containerId": "abc" },
            "modern": { "success": false, "error": "image build failed" },
            "message": "Deployment completed with errors",
            "timestamp": 1735689600000
        }"#;

        let record: DeploymentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.migration_id, "m1");
        assert_eq!(record.status, DeploymentStatus::Success);
        assert_eq!(record.legacy.port, Some(9001));
        assert_eq!(record.modern.error.as_deref(), Some("image build failed"));
        assert_eq!(record.timestamp.timestamp_millis(), 1_735_689_600_000);
    }

    #[test]
    fn payload_profile_is_tagged_by_kind() {
        let profile: TrafficProfile = serde_json::from_str(
            r#"{"mode":"split","payload":{"kind":"parameters","parameters":[{"name":"email","type":"string"}]}}"#,
        )
        .unwrap();

        assert_eq!(profile.mode, TrafficMode::Split);
        assert_eq!(profile.method, TrafficMethod::Post);
        assert!(matches!(profile.payload, PayloadProfile::Parameters { ref parameters } if parameters.len() == 1));
    }

    #[test]
    fn empty_profile_uses_transfer_defaults() {
        let profile: TrafficProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, TrafficProfile::default());
        assert_eq!(
            profile.payload,
            PayloadProfile::Transfer {
                account_pool: 10,
                min_amount: 10,
                max_amount: 109
            }
        );
    }

    #[test]
    fn lock_defaults_to_locked() {
        assert!(TrafficLockState::default().locked);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!DeploymentStatus::Idle.is_terminal());
        assert!(!DeploymentStatus::Deploying.is_terminal());
        assert!(DeploymentStatus::Success.is_terminal());
        assert!(DeploymentStatus::Error.is_terminal());
    }
}
