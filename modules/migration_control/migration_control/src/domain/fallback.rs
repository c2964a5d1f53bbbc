//! Substitutes used when a collaborator cannot answer.
//!
//! The lock fails closed, consistency fails safe (neutral score), and the
//! deployment record and Gateway weight are simply absent. Every substitution
//! is recorded as a degraded sub-system.

use migration_control_sdk::{ConsistencyMetrics, DeploymentRecord, Subsystem, TrafficLockState};
use tracing::warn;

use super::error::DomainError;

pub fn traffic_lock() -> TrafficLockState {
    TrafficLockState { locked: true }
}

pub fn consistency() -> ConsistencyMetrics {
    ConsistencyMetrics::neutral()
}

pub fn deployment() -> Option<DeploymentRecord> {
    None
}

pub fn gateway_weight() -> Option<u8> {
    None
}

/// Collects the sub-systems replaced by their fallback while building a snapshot.
#[derive(Debug, Default)]
pub struct Degradations(Vec<Subsystem>);

impl Degradations {
    /// Value of `result`, or `fallback()` with `subsystem` marked degraded.
    pub fn resolve<T>(
        &mut self,
        subsystem: Subsystem,
        result: Result<T, DomainError>,
        fallback: fn() -> T,
    ) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                warn!(subsystem = ?subsystem, error = %err, "using fallback value");
                if !self.0.contains(&subsystem) {
                    self.0.push(subsystem);
                }
                fallback()
            }
        }
    }

    pub fn into_vec(self) -> Vec<Subsystem> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{ARBITER, GATEWAY};

    #[test]
    fn lock_fails_closed() {
        let mut degraded = Degradations::default();

        let lock = degraded.resolve(
            Subsystem::Gateway,
            Err(DomainError::upstream(GATEWAY, "connection refused")),
            traffic_lock,
        );

        assert!(lock.locked);
        assert_eq!(degraded.into_vec(), vec![Subsystem::Gateway]);
    }

    #[test]
    fn consistency_fails_safe() {
        let mut degraded = Degradations::default();

        let metrics = degraded.resolve(
            Subsystem::Arbiter,
            Err(DomainError::upstream(ARBITER, "timeout")),
            consistency,
        );

        assert_eq!(metrics, ConsistencyMetrics::neutral());
        assert_eq!(metrics.total_transactions, 0);
    }

    #[test]
    fn successful_values_pass_through() {
        let mut degraded = Degradations::default();

        let lock = degraded.resolve(
            Subsystem::Gateway,
            Ok(TrafficLockState { locked: false }),
            traffic_lock,
        );

        assert!(!lock.locked);
        assert!(degraded.into_vec().is_empty());
    }

    #[test]
    fn each_subsystem_is_listed_once() {
        let mut degraded = Degradations::default();
        let _ = degraded.resolve(
            Subsystem::Gateway,
            Err(DomainError::upstream(GATEWAY, "down")),
            traffic_lock,
        );
        let _ = degraded.resolve(
            Subsystem::Gateway,
            Err(DomainError::upstream(GATEWAY, "down")),
            gateway_weight,
        );

        assert_eq!(degraded.into_vec(), vec![Subsystem::Gateway]);
    }
}
