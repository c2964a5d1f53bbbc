use std::sync::Arc;

use async_trait::async_trait;
use migration_control_sdk::{DeploymentRecord, DeploymentResult, DeploymentStatus};

use super::{DeploymentStatusStore, DeploymentTracker};
use crate::domain::error::DomainError;
use crate::infra::storage::InMemoryStatusStore;

fn tracker() -> (Arc<InMemoryStatusStore>, DeploymentTracker) {
    let store = Arc::new(InMemoryStatusStore::default());
    let tracker = DeploymentTracker::new(store.clone());
    (store, tracker)
}

fn provisioned(url: &str) -> DeploymentResult {
    DeploymentResult {
        success: true,
        url: Some(url.to_owned()),
        ..DeploymentResult::default()
    }
}

#[tokio::test]
async fn nothing_recorded_yet() {
    let (_, tracker) = tracker();
    assert!(tracker.current().await.unwrap().is_none());
}

#[tokio::test]
async fn start_writes_deploying_record() {
    let (_, tracker) = tracker();

    let outcome = tracker.record_start("m1").await.unwrap();

    assert!(outcome.applied);
    assert_eq!(outcome.record.status, DeploymentStatus::Deploying);
    assert!(!outcome.record.legacy.success);
    assert_eq!(tracker.current().await.unwrap(), Some(outcome.record));
}

#[tokio::test]
async fn start_rejects_empty_id() {
    let (_, tracker) = tracker();

    let err = tracker.record_start("  ").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "migrationId"));
}

#[tokio::test]
async fn result_for_current_attempt_is_applied() {
    let (_, tracker) = tracker();
    tracker.record_start("m1").await.unwrap();

    let outcome = tracker
        .record_result(
            "m1",
            provisioned("http://localhost:9001"),
            provisioned("http://localhost:9002"),
            DeploymentStatus::Success,
            "Deployment completed".to_owned(),
        )
        .await
        .unwrap();

    assert!(outcome.applied);
    let current = tracker.current().await.unwrap().unwrap();
    assert_eq!(current.status, DeploymentStatus::Success);
    assert_eq!(current.message, "Deployment completed");
    assert_eq!(current.modern.url.as_deref(), Some("http://localhost:9002"));
}

#[tokio::test]
async fn ids_are_matched_after_trimming() {
    let (_, tracker) = tracker();
    let started = tracker.record_start("m1 ").await.unwrap();
    assert_eq!(started.record.migration_id, "m1");

    let outcome = tracker
        .record_result(
            " m1 ",
            provisioned("http://localhost:9001"),
            provisioned("http://localhost:9002"),
            DeploymentStatus::Success,
            String::new(),
        )
        .await
        .unwrap();

    assert!(outcome.applied, "{}", outcome.record.message);
    assert_eq!(outcome.record.migration_id, "m1");
    let current = tracker.current().await.unwrap().unwrap();
    assert_eq!(current.status, DeploymentStatus::Success);
}

#[tokio::test]
async fn stale_result_is_annotated_and_not_persisted() {
    let (_, tracker) = tracker();
    tracker.record_start("m1").await.unwrap();
    tracker.record_start("m2").await.unwrap();

    let outcome = tracker
        .record_result(
            "m1",
            DeploymentResult::default(),
            DeploymentResult::default(),
            DeploymentStatus::Error,
            "late failure".to_owned(),
        )
        .await
        .unwrap();

    assert!(!outcome.applied);
    assert_eq!(outcome.record.migration_id, "m1");
    assert!(outcome.record.message.starts_with(
        "out-of-order: result for superseded migration 'm1' (current 'm2')"
    ));
    assert!(outcome.record.message.ends_with("late failure"));

    let current = tracker.current().await.unwrap().unwrap();
    assert_eq!(current.migration_id, "m2");
    assert_eq!(current.status, DeploymentStatus::Deploying);
}

#[tokio::test]
async fn result_without_any_start_is_not_applied() {
    let (_, tracker) = tracker();

    let outcome = tracker
        .record_result(
            "ghost",
            DeploymentResult::default(),
            DeploymentResult::default(),
            DeploymentStatus::Success,
            String::new(),
        )
        .await
        .unwrap();

    assert!(!outcome.applied);
    assert!(outcome.record.message.starts_with("out-of-order"));
    assert!(tracker.current().await.unwrap().is_none());
}

#[tokio::test]
async fn finished_attempt_cannot_be_rewritten() {
    let (_, tracker) = tracker();
    tracker.record_start("m1").await.unwrap();
    tracker
        .record_result(
            "m1",
            provisioned("http://localhost:9001"),
            provisioned("http://localhost:9002"),
            DeploymentStatus::Success,
            "done".to_owned(),
        )
        .await
        .unwrap();

    let outcome = tracker
        .record_result(
            "m1",
            DeploymentResult::default(),
            DeploymentResult::default(),
            DeploymentStatus::Deploying,
            String::new(),
        )
        .await
        .unwrap();

    assert!(!outcome.applied);
    assert_eq!(
        outcome.record.message,
        "out-of-order: migration 'm1' already finished with status success"
    );
    assert_eq!(
        tracker.current().await.unwrap().unwrap().status,
        DeploymentStatus::Success
    );
}

#[tokio::test]
async fn idle_is_not_a_result() {
    let (_, tracker) = tracker();
    tracker.record_start("m1").await.unwrap();

    let err = tracker
        .record_result(
            "m1",
            DeploymentResult::default(),
            DeploymentResult::default(),
            DeploymentStatus::Idle,
            String::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "status"));
}

struct BrokenStore;

#[async_trait]
impl DeploymentStatusStore for BrokenStore {
    async fn load(&self) -> anyhow::Result<Option<DeploymentRecord>> {
        anyhow::bail!("decoding deployment-status.json: expected value at line 1")
    }

    async fn save(&self, _record: &DeploymentRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn unreadable_document_is_upstream_unavailable() {
    let tracker = DeploymentTracker::new(Arc::new(BrokenStore));

    let err = tracker.current().await.unwrap_err();
    assert!(err.is_upstream());
}
