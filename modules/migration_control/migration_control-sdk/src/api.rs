//! `MigrationControlApi` trait definition.

use async_trait::async_trait;

use crate::errors::MigrationError;
use crate::models::{
    ConsistencyMetrics, DeploymentRecord, DeploymentResult, DeploymentStatus, MigrationStatus,
    MigrationTarget, RecordOutcome, TrafficGeneratorStats, TrafficLockState, TrafficProfile,
    WeightChange, WeightRecord,
};

/// Public API of the migration control plane.
///
/// Weight and activity are tracked per target; the traffic lock is global.
/// Reads that depend on an external collaborator never fail: they fall back
/// to the fail-closed (lock) or fail-safe (consistency) default instead.
#[async_trait]
pub trait MigrationControlApi: Send + Sync {
    /// Mark a migration active without touching its weight.
    async fn start(&self, target: &MigrationTarget) -> Result<WeightChange, MigrationError>;

    /// Mark a migration inactive and reset its weight to zero.
    async fn stop(&self, target: &MigrationTarget) -> Result<WeightChange, MigrationError>;

    /// Overwrite the weight of a target. `weight` must be within `0..=100`.
    async fn set_weight(
        &self,
        target: &MigrationTarget,
        weight: i64,
    ) -> Result<WeightChange, MigrationError>;

    /// Current record of a target, or the inactive default if never written.
    async fn get_weight(&self, target: &MigrationTarget) -> Result<WeightRecord, MigrationError>;

    /// Ask the Gateway to lock or unlock modern traffic.
    ///
    /// On failure the lock is considered engaged.
    async fn set_traffic_lock(&self, locked: bool) -> Result<TrafficLockState, MigrationError>;

    /// Lock state as reported by the Gateway; locked when the Gateway is unreachable.
    async fn get_traffic_lock(&self) -> TrafficLockState;

    /// Aggregated status of one target, or all targets when `None`.
    async fn get_status(
        &self,
        target: Option<&MigrationTarget>,
    ) -> Result<MigrationStatus, MigrationError>;

    /// Consistency metrics from the Arbiter, or the neutral default.
    async fn get_consistency(&self) -> ConsistencyMetrics;

    /// Reset the Arbiter's counters.
    async fn reset_arbiter(&self) -> Result<(), MigrationError>;

    /// Start (or keep) synthetic traffic against `url`.
    async fn start_traffic(
        &self,
        url: &str,
        profile: TrafficProfile,
    ) -> Result<TrafficGeneratorStats, MigrationError>;

    /// Stop synthetic traffic. No-op when idle.
    async fn stop_traffic(&self) -> TrafficGeneratorStats;

    /// Snapshot of the generator counters. Never performs network I/O.
    fn traffic_stats(&self) -> TrafficGeneratorStats;

    /// Latest deployment record, if any.
    async fn current_deployment(&self) -> Result<Option<DeploymentRecord>, MigrationError>;

    /// Begin tracking a new migration attempt.
    async fn record_deployment_start(
        &self,
        migration_id: &str,
    ) -> Result<RecordOutcome, MigrationError>;

    /// Record the provisioning result of a migration attempt.
    async fn record_deployment_result(
        &self,
        migration_id: &str,
        legacy: DeploymentResult,
        modern: DeploymentResult,
        status: DeploymentStatus,
        message: String,
    ) -> Result<RecordOutcome, MigrationError>;
}
