use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use migration_control_sdk::{
    ConsistencyMetrics, DeploymentRecord, DeploymentResult, DeploymentStatus, MAX_WEIGHT,
    MigrationStatus, MigrationTarget, RecordOutcome, Subsystem, TrafficGeneratorStats,
    TrafficLockState, TrafficProfile, WeightChange, WeightRecord,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::error::{ARBITER, DEPLOYMENT_STORE, DomainError, GATEWAY};
use super::fallback::{self, Degradations};
use super::lifecycle::DeploymentTracker;
use super::ports::{ArbiterClient, GatewayClient};
use super::store::{WeightStore, WeightUpdate};
use super::traffic::TrafficGenerator;

// ============================================================================
// Service Configuration
// ============================================================================

pub struct ServiceConfig {
    /// Bound on every Gateway, Arbiter and status document call.
    pub upstream_timeout: Duration,
    /// Forward weight changes to the Gateway.
    pub push_weights: bool,
    /// Base URL used to derive a synthetic traffic URL from a target.
    pub gateway_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upstream_timeout: Duration::from_secs(3),
            push_weights: true,
            gateway_url: "http://localhost:8082".to_owned(),
        }
    }
}

/// Collaborators of the controller.
pub struct Collaborators {
    pub store: Arc<dyn WeightStore>,
    pub gateway: Arc<dyn GatewayClient>,
    pub arbiter: Arc<dyn ArbiterClient>,
    pub tracker: Arc<DeploymentTracker>,
    pub traffic: Arc<TrafficGenerator>,
}

// ============================================================================
// Controller
// ============================================================================

/// Migration controller: validates control commands, mutates the Weight
/// Store and the traffic lock, and aggregates status across collaborators.
pub struct MigrationController {
    targets: Vec<MigrationTarget>,
    // One gate per known target. Held across the store write and the Gateway
    // push so the Gateway sees weights in store order.
    write_gates: HashMap<MigrationTarget, Mutex<()>>,
    store: Arc<dyn WeightStore>,
    gateway: Arc<dyn GatewayClient>,
    arbiter: Arc<dyn ArbiterClient>,
    tracker: Arc<DeploymentTracker>,
    traffic: Arc<TrafficGenerator>,
    config: ServiceConfig,
}

impl MigrationController {
    pub fn new(targets: Vec<MigrationTarget>, deps: Collaborators, config: ServiceConfig) -> Self {
        let write_gates = targets.iter().map(|t| (t.clone(), Mutex::new(()))).collect();
        Self {
            targets,
            write_gates,
            store: deps.store,
            gateway: deps.gateway,
            arbiter: deps.arbiter,
            tracker: deps.tracker,
            traffic: deps.traffic,
            config,
        }
    }

    pub fn targets(&self) -> &[MigrationTarget] {
        &self.targets
    }

    // ------------------------------------------------------------------
    // Weight and activity
    // ------------------------------------------------------------------

    pub async fn start(&self, target: &MigrationTarget) -> Result<WeightChange, DomainError> {
        let _gate = self.gate(target)?.lock().await;

        let record = self.store.update(target, WeightUpdate::Activate).await?;
        info!(service = %target, weight = record.weight, "migration started");

        Ok(WeightChange {
            record,
            gateway_synced: None,
        })
    }

    /// Rollback: inactive and zero weight in one store write.
    pub async fn stop(&self, target: &MigrationTarget) -> Result<WeightChange, DomainError> {
        let _gate = self.gate(target)?.lock().await;

        let record = self.store.update(target, WeightUpdate::Deactivate).await?;
        info!(service = %target, "migration stopped, weight reset to 0");
        let gateway_synced = self.push_weight(&record).await;

        Ok(WeightChange {
            record,
            gateway_synced,
        })
    }

    pub async fn set_weight(
        &self,
        target: &MigrationTarget,
        weight: i64,
    ) -> Result<WeightChange, DomainError> {
        let gate = self.gate(target)?;
        let weight = u8::try_from(weight)
            .ok()
            .filter(|w| *w <= MAX_WEIGHT)
            .ok_or_else(|| {
                DomainError::validation(
                    "weight",
                    format!("must be between 0 and {MAX_WEIGHT}, got {weight}"),
                )
            })?;

        let _gate = gate.lock().await;
        let record = self.store.update(target, WeightUpdate::SetWeight(weight)).await?;
        info!(service = %target, weight, active = record.active, "weight updated");
        let gateway_synced = self.push_weight(&record).await;

        Ok(WeightChange {
            record,
            gateway_synced,
        })
    }

    pub async fn get_weight(&self, target: &MigrationTarget) -> Result<WeightRecord, DomainError> {
        self.gate(target)?;
        self.read_record(target).await
    }

    // ------------------------------------------------------------------
    // Traffic lock
    // ------------------------------------------------------------------

    /// Forward a lock change to the Gateway. If the Gateway does not
    /// acknowledge, the lock is considered engaged and the error is returned.
    pub async fn set_traffic_lock(&self, locked: bool) -> Result<TrafficLockState, DomainError> {
        match self
            .bounded(GATEWAY, self.gateway.set_traffic_lock(locked))
            .await
        {
            Ok(acknowledged) => {
                self.reflect_lock(acknowledged).await;
                info!(locked = acknowledged, "traffic lock updated");
                Ok(TrafficLockState {
                    locked: acknowledged,
                })
            }
            Err(err) => {
                warn!(requested = locked, error = %err, "traffic lock change not acknowledged, treating as locked");
                self.reflect_lock(true).await;
                Err(err)
            }
        }
    }

    pub async fn get_traffic_lock(&self) -> TrafficLockState {
        let mut degraded = Degradations::default();
        degraded.resolve(Subsystem::Gateway, self.fetch_lock().await, fallback::traffic_lock)
    }

    // ------------------------------------------------------------------
    // Arbiter
    // ------------------------------------------------------------------

    pub async fn get_consistency(&self) -> ConsistencyMetrics {
        let mut degraded = Degradations::default();
        degraded.resolve(
            Subsystem::Arbiter,
            self.bounded(ARBITER, self.arbiter.metrics()).await,
            fallback::consistency,
        )
    }

    pub async fn reset_arbiter(&self) -> Result<(), DomainError> {
        self.bounded(ARBITER, self.arbiter.reset()).await?;
        info!("arbiter counters reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// Snapshot of one target (or all), with the lock, consistency metrics
    /// and deployment record gathered concurrently. Collaborator failures
    /// degrade the snapshot; only a failing Weight Store fails the call.
    pub async fn get_status(
        &self,
        target: Option<&MigrationTarget>,
    ) -> Result<MigrationStatus, DomainError> {
        let targets = match target {
            Some(t) => {
                self.gate(t)?;
                std::slice::from_ref(t)
            }
            None => self.targets.as_slice(),
        };

        let records = async {
            let mut records = Vec::with_capacity(targets.len());
            for t in targets {
                records.push(self.read_record(t).await?);
            }
            Ok::<_, DomainError>(records)
        };
        let gateway_weight = async {
            match target {
                Some(t) => Some(self.bounded(GATEWAY, self.gateway.weight(t)).await),
                None => None,
            }
        };

        let (records, lock, consistency, deployment, gateway_weight) = tokio::join!(
            records,
            self.fetch_lock(),
            self.bounded(ARBITER, self.arbiter.metrics()),
            self.bounded(DEPLOYMENT_STORE, self.tracker.current()),
            gateway_weight,
        );
        let records = records?;
        let last_known_lock = match self.store.lock_flag().await {
            Ok(flag) => flag,
            Err(err) => {
                warn!(error = %err, "failed to read local traffic lock flag");
                None
            }
        };

        let mut degraded = Degradations::default();
        let lock = degraded.resolve(Subsystem::Gateway, lock, fallback::traffic_lock);
        let consistency = degraded.resolve(Subsystem::Arbiter, consistency, fallback::consistency);
        let deployment = degraded.resolve(Subsystem::Deployment, deployment, fallback::deployment);
        let gateway_weight = gateway_weight.and_then(|result| {
            degraded.resolve(Subsystem::Gateway, result.map(Some), fallback::gateway_weight)
        });

        Ok(MigrationStatus {
            requested: target.cloned(),
            targets: records,
            gateway_weight,
            lock,
            last_known_lock,
            consistency,
            deployment,
            degraded: degraded.into_vec(),
        })
    }

    // ------------------------------------------------------------------
    // Synthetic traffic
    // ------------------------------------------------------------------

    /// URL for synthetic traffic: the explicit one, else the target's
    /// transfer endpoint behind the Gateway.
    pub fn traffic_url(
        &self,
        url: Option<&str>,
        target: Option<&MigrationTarget>,
    ) -> Result<String, DomainError> {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(url.to_owned());
        }
        let Some(target) = target else {
            return Err(DomainError::validation(
                "url",
                "either url or target is required to start traffic",
            ));
        };
        self.gate(target)?;
        Ok(format!(
            "{}/{target}/transfer",
            self.config.gateway_url.trim_end_matches('/')
        ))
    }

    pub fn start_traffic(
        &self,
        url: &str,
        profile: TrafficProfile,
    ) -> Result<TrafficGeneratorStats, DomainError> {
        self.traffic.start(url, profile)
    }

    pub fn stop_traffic(&self) -> TrafficGeneratorStats {
        self.traffic.stop()
    }

    pub fn traffic_stats(&self) -> TrafficGeneratorStats {
        self.traffic.stats()
    }

    // ------------------------------------------------------------------
    // Deployment lifecycle
    // ------------------------------------------------------------------

    pub async fn current_deployment(&self) -> Result<Option<DeploymentRecord>, DomainError> {
        self.bounded(DEPLOYMENT_STORE, self.tracker.current()).await
    }

    pub async fn record_deployment_start(
        &self,
        migration_id: &str,
    ) -> Result<RecordOutcome, DomainError> {
        self.tracker.record_start(migration_id).await
    }

    pub async fn record_deployment_result(
        &self,
        migration_id: &str,
        legacy: DeploymentResult,
        modern: DeploymentResult,
        status: DeploymentStatus,
        message: String,
    ) -> Result<RecordOutcome, DomainError> {
        self.tracker
            .record_result(migration_id, legacy, modern, status, message)
            .await
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn gate(&self, target: &MigrationTarget) -> Result<&Mutex<()>, DomainError> {
        self.write_gates
            .get(target)
            .ok_or_else(|| DomainError::UnknownTarget {
                target: target.to_string(),
            })
    }

    async fn read_record(&self, target: &MigrationTarget) -> Result<WeightRecord, DomainError> {
        Ok(self
            .store
            .get(target)
            .await?
            .unwrap_or_else(|| WeightRecord::inactive(target.clone())))
    }

    async fn fetch_lock(&self) -> Result<TrafficLockState, DomainError> {
        let locked = self.bounded(GATEWAY, self.gateway.traffic_lock()).await?;
        self.reflect_lock(locked).await;
        Ok(TrafficLockState { locked })
    }

    async fn reflect_lock(&self, locked: bool) {
        if let Err(err) = self.store.set_lock_flag(locked).await {
            warn!(locked, error = %err, "failed to record traffic lock locally");
        }
    }

    /// Best-effort propagation. `None` when pushing is disabled.
    async fn push_weight(&self, record: &WeightRecord) -> Option<bool> {
        if !self.config.push_weights {
            return None;
        }
        match self
            .bounded(GATEWAY, self.gateway.push_weight(&record.target, record.weight))
            .await
        {
            Ok(()) => Some(true),
            Err(err) => {
                warn!(
                    service = %record.target,
                    weight = record.weight,
                    error = %err,
                    "gateway did not accept weight, local value stays authoritative"
                );
                Some(false)
            }
        }
    }

    async fn bounded<T>(
        &self,
        service: &'static str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        let limit = self.config.upstream_timeout;
        tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(DomainError::upstream(
                service,
                format!("no answer within {} ms", limit.as_millis()),
            ))
        })
    }
}
