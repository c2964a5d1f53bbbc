//! Migration control SDK
//!
//! Public surface of the migration control plane:
//! - `MigrationControlApi` trait implemented by the `migration_control` module
//! - Model types (`WeightRecord`, `DeploymentRecord`, `ConsistencyMetrics`, ...)
//! - Error taxonomy (`MigrationError`)
//!
//! ```ignore
//! let api: Arc<dyn MigrationControlApi> = module.api();
//! api.set_weight(&MigrationTarget::new("python"), 25).await?;
//! let status = api.get_status(Some(&MigrationTarget::new("python"))).await;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::MigrationControlApi;
pub use errors::MigrationError;
pub use models::{
    ConsistencyMetrics, ControlAction, DeploymentRecord, DeploymentResult, DeploymentStatus,
    MAX_WEIGHT, MigrationStatus, MigrationTarget, ParameterSpec, PayloadProfile, RecordOutcome,
    Subsystem, TrafficAction, TrafficGeneratorStats, TrafficLockState, TrafficMethod, TrafficMode,
    TrafficProfile, WeightChange, WeightRecord,
};
