//! Local client adapter implementing the SDK API trait.
//!
//! Bridges the controller to the public `MigrationControlApi` trait so other
//! in-process components do not depend on domain types.

use std::sync::Arc;

use async_trait::async_trait;
use migration_control_sdk::{
    ConsistencyMetrics, DeploymentRecord, DeploymentResult, DeploymentStatus, MigrationControlApi,
    MigrationError, MigrationStatus, MigrationTarget, RecordOutcome, TrafficGeneratorStats,
    TrafficLockState, TrafficProfile, WeightChange, WeightRecord,
};

use crate::domain::service::MigrationController;

pub struct MigrationControlLocalClient {
    controller: Arc<MigrationController>,
}

impl MigrationControlLocalClient {
    pub fn new(controller: Arc<MigrationController>) -> Self {
        Self { controller }
    }
}

#[async_trait]
impl MigrationControlApi for MigrationControlLocalClient {
    async fn start(&self, target: &MigrationTarget) -> Result<WeightChange, MigrationError> {
        self.controller.start(target).await.map_err(Into::into)
    }

    async fn stop(&self, target: &MigrationTarget) -> Result<WeightChange, MigrationError> {
        self.controller.stop(target).await.map_err(Into::into)
    }

    async fn set_weight(
        &self,
        target: &MigrationTarget,
        weight: i64,
    ) -> Result<WeightChange, MigrationError> {
        self.controller
            .set_weight(target, weight)
            .await
            .map_err(Into::into)
    }

    async fn get_weight(&self, target: &MigrationTarget) -> Result<WeightRecord, MigrationError> {
        self.controller.get_weight(target).await.map_err(Into::into)
    }

    async fn set_traffic_lock(&self, locked: bool) -> Result<TrafficLockState, MigrationError> {
        self.controller
            .set_traffic_lock(locked)
            .await
            .map_err(Into::into)
    }

    async fn get_traffic_lock(&self) -> TrafficLockState {
        self.controller.get_traffic_lock().await
    }

    async fn get_status(
        &self,
        target: Option<&MigrationTarget>,
    ) -> Result<MigrationStatus, MigrationError> {
        self.controller.get_status(target).await.map_err(Into::into)
    }

    async fn get_consistency(&self) -> ConsistencyMetrics {
        self.controller.get_consistency().await
    }

    async fn reset_arbiter(&self) -> Result<(), MigrationError> {
        self.controller.reset_arbiter().await.map_err(Into::into)
    }

    async fn start_traffic(
        &self,
        url: &str,
        profile: TrafficProfile,
    ) -> Result<TrafficGeneratorStats, MigrationError> {
        self.controller
            .start_traffic(url, profile)
            .map_err(Into::into)
    }

    async fn stop_traffic(&self) -> TrafficGeneratorStats {
        self.controller.stop_traffic()
    }

    fn traffic_stats(&self) -> TrafficGeneratorStats {
        self.controller.traffic_stats()
    }

    async fn current_deployment(&self) -> Result<Option<DeploymentRecord>, MigrationError> {
        self.controller
            .current_deployment()
            .await
            .map_err(Into::into)
    }

    async fn record_deployment_start(
        &self,
        migration_id: &str,
    ) -> Result<RecordOutcome, MigrationError> {
        self.controller
            .record_deployment_start(migration_id)
            .await
            .map_err(Into::into)
    }

    async fn record_deployment_result(
        &self,
        migration_id: &str,
        legacy: DeploymentResult,
        modern: DeploymentResult,
        status: DeploymentStatus,
        message: String,
    ) -> Result<RecordOutcome, MigrationError> {
        self.controller
            .record_deployment_result(migration_id, legacy, modern, status, message)
            .await
            .map_err(Into::into)
    }
}
