use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use migration_control_sdk::{TrafficGeneratorStats, TrafficMethod, TrafficMode, TrafficProfile};
use parking_lot::Mutex;
use serde_json::Value;

use super::TrafficGenerator;
use crate::domain::error::DomainError;
use crate::domain::ports::{SendOutcome, TrafficTransport};

const TICK: Duration = Duration::from_millis(10);

struct RecordingTransport {
    outcome: SendOutcome,
    delay: Duration,
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingTransport {
    fn answering(outcome: SendOutcome) -> Arc<Self> {
        Self::slow(outcome, Duration::ZERO)
    }

    fn slow(outcome: SendOutcome, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            delay,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(url, _)| url.clone()).collect()
    }
}

#[async_trait]
impl TrafficTransport for RecordingTransport {
    async fn send(&self, url: &str, _method: TrafficMethod, body: &Value) -> SendOutcome {
        self.calls.lock().push((url.to_owned(), body.clone()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

async fn wait_until(generator: &TrafficGenerator, pred: impl Fn(&TrafficGeneratorStats) -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if pred(&generator.stats()) {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached, stats: {:?}",
            generator.stats()
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn idle_generator_reports_zeroes() {
    let generator = TrafficGenerator::new(RecordingTransport::answering(SendOutcome::Status(200)), TICK);

    let stats = generator.stop();

    assert_eq!(stats, TrafficGeneratorStats::default());
    assert!(!generator.is_running());
}

#[tokio::test]
async fn dispatches_tagged_payloads_and_counts_successes() {
    let transport = RecordingTransport::answering(SendOutcome::Status(200));
    let generator = TrafficGenerator::new(transport.clone(), TICK);

    let started = generator
        .start("http://gateway.local/python/transfer", TrafficProfile::default())
        .unwrap();
    assert!(started.running);
    assert_eq!(started.mode, Some(TrafficMode::Shadow));
    assert_eq!(started.target_url.as_deref(), Some("http://gateway.local/python/transfer"));

    wait_until(&generator, |s| s.requests_succeeded >= 3).await;
    let stats = generator.stop();

    assert_eq!(stats.last_status, Some(200));
    assert_eq!(stats.requests_failed, 0);
    let calls = transport.calls.lock();
    assert!(calls.iter().all(|(_, body)| body["mode"] == "shadow"));
    assert!(calls.iter().all(|(_, body)| body["account_number"].is_string()));
}

#[tokio::test]
async fn error_statuses_count_as_failures() {
    let generator = TrafficGenerator::new(RecordingTransport::answering(SendOutcome::Status(502)), TICK);

    generator.start("http://gateway.local/php/transfer", TrafficProfile::default()).unwrap();
    wait_until(&generator, |s| s.requests_failed >= 2).await;
    let stats = generator.stop();

    assert_eq!(stats.requests_succeeded, 0);
    assert_eq!(stats.last_status, Some(502));
}

#[tokio::test]
async fn unreachable_endpoint_counts_failures_without_status() {
    let generator = TrafficGenerator::new(
        RecordingTransport::answering(SendOutcome::Failed("connection refused".to_owned())),
        TICK,
    );

    generator.start("http://127.0.0.1:9/transfer", TrafficProfile::default()).unwrap();
    wait_until(&generator, |s| s.requests_failed >= 2).await;
    let stats = generator.stop();

    assert_eq!(stats.last_status, None);
}

#[tokio::test]
async fn nothing_is_dispatched_after_stop() {
    let transport = RecordingTransport::answering(SendOutcome::Status(200));
    let generator = TrafficGenerator::new(transport.clone(), TICK);

    generator.start("http://gateway.local/python/transfer", TrafficProfile::default()).unwrap();
    wait_until(&generator, |s| s.requests_sent >= 2).await;

    let stopped = generator.stop();
    let calls_at_stop = stopped.requests_sent;
    tokio::time::sleep(TICK * 10).await;

    let later = generator.stats();
    assert!(!later.running);
    assert_eq!(later.requests_sent, calls_at_stop);
    assert!(transport.urls().len() as u64 <= calls_at_stop);
}

#[tokio::test]
async fn in_flight_requests_still_report_after_stop() {
    let transport = RecordingTransport::slow(SendOutcome::Status(201), Duration::from_millis(250));
    let generator = TrafficGenerator::new(transport, TICK);

    generator.start("http://gateway.local/python/transfer", TrafficProfile::default()).unwrap();
    wait_until(&generator, |s| s.requests_sent >= 1).await;
    let stopped = generator.stop();
    assert!(stopped.requests_succeeded < stopped.requests_sent);

    wait_until(&generator, |s| {
        s.requests_succeeded + s.requests_failed == stopped.requests_sent
    })
    .await;
    assert_eq!(generator.stats().requests_succeeded, stopped.requests_sent);
}

#[tokio::test]
async fn restarting_same_url_keeps_counters() {
    let generator = TrafficGenerator::new(RecordingTransport::answering(SendOutcome::Status(200)), TICK);
    let url = "http://gateway.local/python/transfer";

    generator.start(url, TrafficProfile::default()).unwrap();
    wait_until(&generator, |s| s.requests_sent >= 3).await;

    let again = generator.start(url, TrafficProfile::default()).unwrap();

    assert!(again.running);
    assert!(again.requests_sent >= 3);
    generator.stop();
}

#[tokio::test]
async fn different_url_replaces_the_run() {
    let transport = RecordingTransport::answering(SendOutcome::Status(200));
    let generator = TrafficGenerator::new(transport.clone(), TICK);

    generator.start("http://gateway.local/python/transfer", TrafficProfile::default()).unwrap();
    wait_until(&generator, |s| s.requests_sent >= 3).await;

    let profile = TrafficProfile {
        mode: TrafficMode::Split,
        ..TrafficProfile::default()
    };
    let replaced = generator.start("http://gateway.local/php/transfer", profile).unwrap();
    assert_eq!(replaced.requests_sent, 0);
    assert_eq!(replaced.mode, Some(TrafficMode::Split));

    wait_until(&generator, |s| s.requests_sent >= 2).await;
    let stats = generator.stop();

    assert_eq!(stats.target_url.as_deref(), Some("http://gateway.local/php/transfer"));
    let urls = transport.urls();
    assert!(urls.iter().filter(|u| u.ends_with("/python/transfer")).count() >= 3);
    assert!(urls.iter().filter(|u| u.ends_with("/php/transfer")).count() >= 2);
    assert!(urls.last().is_some_and(|u| u.ends_with("/php/transfer")));
}

#[tokio::test]
async fn start_after_stop_resets_counters() {
    let generator = TrafficGenerator::new(RecordingTransport::answering(SendOutcome::Status(200)), TICK);
    let url = "http://gateway.local/python/transfer";

    generator.start(url, TrafficProfile::default()).unwrap();
    wait_until(&generator, |s| s.requests_sent >= 2).await;
    generator.stop();

    let restarted = generator.start(url, TrafficProfile::default()).unwrap();
    assert!(restarted.running);
    assert_eq!(restarted.requests_sent, 0);
    generator.stop();
}

#[tokio::test]
async fn rejects_bad_urls() {
    let generator = TrafficGenerator::new(RecordingTransport::answering(SendOutcome::Status(200)), TICK);

    let err = generator.start("not a url", TrafficProfile::default()).unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "url"));

    let err = generator.start("ftp://gateway.local/x", TrafficProfile::default()).unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    assert!(!generator.is_running());
}
