//! Deployment lifecycle tracker.
//!
//! Keeps only the latest migration attempt. Results are applied only to the
//! attempt most recently started and only while it has not finished; other
//! results are returned annotated, never persisted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use migration_control_sdk::{DeploymentRecord, DeploymentResult, DeploymentStatus, RecordOutcome};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::error::{DEPLOYMENT_STORE, DomainError};

/// Persistence of the single current deployment record.
#[async_trait]
pub trait DeploymentStatusStore: Send + Sync {
    /// Current record, `None` when nothing was ever written.
    async fn load(&self) -> anyhow::Result<Option<DeploymentRecord>>;

    /// Replace the current record.
    async fn save(&self, record: &DeploymentRecord) -> anyhow::Result<()>;
}

pub struct DeploymentTracker {
    store: Arc<dyn DeploymentStatusStore>,
    // Serializes read-modify-write cycles on the document.
    write_lock: Mutex<()>,
}

impl DeploymentTracker {
    pub fn new(store: Arc<dyn DeploymentStatusStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Latest record. An unreadable document is reported as an unavailable
    /// collaborator so status aggregation can degrade instead of failing.
    pub async fn current(&self) -> Result<Option<DeploymentRecord>, DomainError> {
        self.store
            .load()
            .await
            .map_err(|e| DomainError::upstream(DEPLOYMENT_STORE, format!("{e:#}")))
    }

    pub async fn record_start(&self, migration_id: &str) -> Result<RecordOutcome, DomainError> {
        let migration_id = migration_id.trim();
        if migration_id.is_empty() {
            return Err(DomainError::validation("migrationId", "must not be empty"));
        }

        let record = DeploymentRecord {
            migration_id: migration_id.to_owned(),
            status: DeploymentStatus::Deploying,
            legacy: DeploymentResult::default(),
            modern: DeploymentResult::default(),
            message: "deployment started".to_owned(),
            timestamp: Utc::now(),
        };

        let _guard = self.write_lock.lock().await;
        self.store.save(&record).await?;
        info!(migration_id = %record.migration_id, "deployment started");

        Ok(RecordOutcome {
            applied: true,
            record,
        })
    }

    pub async fn record_result(
        &self,
        migration_id: &str,
        legacy: DeploymentResult,
        modern: DeploymentResult,
        status: DeploymentStatus,
        message: String,
    ) -> Result<RecordOutcome, DomainError> {
        let migration_id = migration_id.trim();
        if migration_id.is_empty() {
            return Err(DomainError::validation("migrationId", "must not be empty"));
        }
        if status == DeploymentStatus::Idle {
            return Err(DomainError::validation(
                "status",
                "a result must be deploying, success or error",
            ));
        }

        let mut record = DeploymentRecord {
            migration_id: migration_id.to_owned(),
            status,
            legacy,
            modern,
            message,
            timestamp: Utc::now(),
        };

        let _guard = self.write_lock.lock().await;
        let current = self.current().await?;

        let rejection = match &current {
            Some(cur) if cur.migration_id != record.migration_id => Some(format!(
                "out-of-order: result for superseded migration '{}' (current '{}')",
                record.migration_id, cur.migration_id
            )),
            None => Some(format!(
                "out-of-order: result for superseded migration '{}' (no migration started)",
                record.migration_id
            )),
            Some(cur) if cur.status.is_terminal() => Some(format!(
                "out-of-order: migration '{}' already finished with status {}",
                record.migration_id, cur.status
            )),
            Some(_) => None,
        };

        if let Some(reason) = rejection {
            warn!(
                migration_id = %record.migration_id,
                current = current.as_ref().map_or("", |c| c.migration_id.as_str()),
                status = %record.status,
                "{reason}"
            );
            record.message = if record.message.is_empty() {
                reason
            } else {
                format!("{reason}: {}", record.message)
            };
            return Ok(RecordOutcome {
                applied: false,
                record,
            });
        }

        self.store.save(&record).await?;
        info!(
            migration_id = %record.migration_id,
            status = %record.status,
            "deployment result recorded"
        );

        Ok(RecordOutcome {
            applied: true,
            record,
        })
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
