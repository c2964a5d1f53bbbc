//! Synthetic traffic generator.
//!
//! A run is a background task that wakes up on a fixed interval and
//! dispatches one request per tick. Each run owns its counters; starting a
//! new run swaps in fresh counters, so late completions of a replaced run
//! never leak into the new one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use migration_control_sdk::{TrafficGeneratorStats, TrafficProfile};
use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::error::DomainError;
use super::payload;
use super::ports::{SendOutcome, TrafficTransport};

type SharedStats = Arc<Mutex<TrafficGeneratorStats>>;

struct ActiveRun {
    url: String,
    cancel: CancellationToken,
}

#[derive(Default)]
struct GeneratorState {
    run: Option<ActiveRun>,
    stats: SharedStats,
}

pub struct TrafficGenerator {
    transport: Arc<dyn TrafficTransport>,
    interval: Duration,
    state: Mutex<GeneratorState>,
}

impl TrafficGenerator {
    pub fn new(transport: Arc<dyn TrafficTransport>, interval: Duration) -> Self {
        Self {
            transport,
            interval,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    /// Start dispatching to `url`.
    ///
    /// No-op while a run against the same URL is active. A run against a
    /// different URL is stopped and replaced, with fresh counters.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        &self,
        url: &str,
        profile: TrafficProfile,
    ) -> Result<TrafficGeneratorStats, DomainError> {
        let parsed = Url::parse(url).map_err(|e| {
            DomainError::validation("url", format!("'{url}' is not a valid URL: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::validation(
                "url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        payload::validate(&profile.payload)?;

        let mut state = self.state.lock();

        if let Some(run) = &state.run {
            if run.url == url {
                debug!(url, "traffic generator already running");
                return Ok(state.stats.lock().clone());
            }
            info!(previous = %run.url, url, "replacing traffic generator run");
            halt(run, &state.stats);
        }

        let stats: SharedStats = Arc::new(Mutex::new(TrafficGeneratorStats {
            running: true,
            target_url: Some(url.to_owned()),
            mode: Some(profile.mode),
            started_at: Some(Utc::now()),
            ..TrafficGeneratorStats::default()
        }));
        let cancel = CancellationToken::new();
        let mode = profile.mode;

        tokio::spawn(dispatch_loop(
            Arc::clone(&self.transport),
            url.to_owned(),
            profile,
            self.interval,
            cancel.clone(),
            Arc::clone(&stats),
        ));

        info!(url, mode = mode.as_str(), "traffic generator started");
        let snapshot = stats.lock().clone();
        state.stats = stats;
        state.run = Some(ActiveRun {
            url: url.to_owned(),
            cancel,
        });
        Ok(snapshot)
    }

    /// Stop the active run. No request is dispatched after this returns;
    /// requests already in flight still report their outcome.
    pub fn stop(&self) -> TrafficGeneratorStats {
        let mut state = self.state.lock();
        if let Some(run) = state.run.take() {
            halt(&run, &state.stats);
            info!(url = %run.url, "traffic generator stopped");
        }
        state.stats.lock().clone()
    }

    /// Counters of the current or most recent run.
    pub fn stats(&self) -> TrafficGeneratorStats {
        let stats = Arc::clone(&self.state.lock().stats);
        stats.lock().clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().run.is_some()
    }
}

impl Drop for TrafficGenerator {
    fn drop(&mut self) {
        if let Some(run) = self.state.get_mut().run.take() {
            run.cancel.cancel();
        }
    }
}

// Cancelling under the stats lock pairs with the check in `dispatch_loop`:
// once this returns, no further request can be counted as sent.
fn halt(run: &ActiveRun, stats: &SharedStats) {
    let mut stats = stats.lock();
    run.cancel.cancel();
    stats.running = false;
}

async fn dispatch_loop(
    transport: Arc<dyn TrafficTransport>,
    url: String,
    profile: TrafficProfile,
    interval: Duration,
    cancel: CancellationToken,
    stats: SharedStats,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let body = payload::generate(&profile.payload, profile.mode, &mut rand::rng());

        {
            let mut stats = stats.lock();
            if cancel.is_cancelled() {
                break;
            }
            stats.requests_sent += 1;
        }

        let transport = Arc::clone(&transport);
        let stats = Arc::clone(&stats);
        let url = url.clone();
        let method = profile.method;
        tokio::spawn(async move {
            let outcome = transport.send(&url, method, &body).await;
            record(&stats, &outcome);
            match outcome {
                SendOutcome::Status(code) => {
                    debug!(url = %url, status_code = code, "synthetic request done");
                }
                SendOutcome::Failed(reason) => {
                    warn!(url = %url, %reason, "synthetic request failed");
                }
            }
        });
    }

    debug!(url = %url, "traffic dispatch loop exited");
}

fn record(stats: &SharedStats, outcome: &SendOutcome) {
    let mut stats = stats.lock();
    if outcome.is_success() {
        stats.requests_succeeded += 1;
    } else {
        stats.requests_failed += 1;
    }
    if let SendOutcome::Status(code) = outcome {
        stats.last_status = Some(*code);
    }
}

#[cfg(test)]
#[path = "traffic_tests.rs"]
mod traffic_tests;
