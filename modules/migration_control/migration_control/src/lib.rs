#![allow(clippy::doc_markdown, clippy::must_use_candidate)]
#![allow(clippy::str_to_string)]

//! Migration control plane.
//!
//! Tracks per-target migration weight and activity, relays the global traffic
//! lock to the Gateway, surfaces the Arbiter's consistency metrics and the
//! deployment lifecycle, and drives synthetic comparison traffic.
//!
//! ```text
//!        operator / dashboard           in-process callers
//!                │                              │
//!                ▼ REST /migration/v1           ▼ dyn MigrationControlApi
//! ┌──────────────────────────────────────────────────────────┐
//! │                  MigrationController                     │
//! │   Weight Store · Lifecycle Tracker · Traffic Generator   │
//! └──────────────────────────────────────────────────────────┘
//!          │                      │                  │
//!          ▼                      ▼                  ▼
//!   Gateway admin API        Arbiter /status   deployment-status.json
//! ```

// === PUBLIC API (from SDK) ===
pub use migration_control_sdk::{
    ConsistencyMetrics, ControlAction, DeploymentRecord, DeploymentResult, DeploymentStatus,
    MAX_WEIGHT, MigrationControlApi, MigrationError, MigrationStatus, MigrationTarget,
    ParameterSpec, PayloadProfile, RecordOutcome, Subsystem, TrafficAction, TrafficGeneratorStats,
    TrafficLockState, TrafficMethod, TrafficMode, TrafficProfile, WeightChange, WeightRecord,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::MigrationControlModule;

// === LOCAL CLIENT ===
pub mod local_client;

// === CONFIGURATION ===
pub mod config;
pub use config::MigrationControlConfig;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

#[cfg(test)]
mod config_tests;
