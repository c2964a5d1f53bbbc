//! Migration control module definition.

use std::sync::Arc;

use axum::Router;
use migration_control_sdk::{MigrationControlApi, MigrationTarget};
use tracing::info;

use crate::api::rest::routes;
use crate::config::MigrationControlConfig;
use crate::domain::lifecycle::DeploymentTracker;
use crate::domain::service::{Collaborators, MigrationController, ServiceConfig};
use crate::domain::traffic::TrafficGenerator;
use crate::infra::storage::{FileStatusStore, InMemoryWeightStore};
use crate::infra::{HttpArbiterClient, HttpGatewayClient, HttpTrafficTransport};
use crate::local_client::MigrationControlLocalClient;

impl From<&MigrationControlConfig> for ServiceConfig {
    fn from(cfg: &MigrationControlConfig) -> Self {
        Self {
            upstream_timeout: cfg.upstream_timeout(),
            push_weights: cfg.push_weights_to_gateway,
            gateway_url: cfg.gateway_url.clone(),
        }
    }
}

/// Migration control module.
///
/// Owns the controller and exposes it two ways: the REST router mounted by
/// the server, and the [`MigrationControlApi`] trait for in-process callers.
pub struct MigrationControlModule {
    controller: Arc<MigrationController>,
}

impl MigrationControlModule {
    /// Wire the module against the collaborators named in `cfg`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(cfg: &MigrationControlConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        info!(
            targets = ?cfg.targets,
            gateway = %cfg.gateway_url,
            arbiter = %cfg.arbiter_url,
            "Initializing migration control module"
        );

        let timeout = cfg.upstream_timeout();
        let gateway = Arc::new(HttpGatewayClient::new(&cfg.gateway_url, timeout)?);
        let arbiter = Arc::new(HttpArbiterClient::new(&cfg.arbiter_url, timeout)?);
        let transport = Arc::new(HttpTrafficTransport::new(cfg.traffic_request_timeout())?);

        let status_store = Arc::new(FileStatusStore::new(&cfg.deployment_status_path));
        info!(path = %status_store.path().display(), "Tracking deployment status document");

        let deps = Collaborators {
            store: Arc::new(InMemoryWeightStore::new()),
            gateway,
            arbiter,
            tracker: Arc::new(DeploymentTracker::new(status_store)),
            traffic: Arc::new(TrafficGenerator::new(transport, cfg.traffic_interval())),
        };
        let targets = cfg.targets.iter().map(MigrationTarget::new).collect();

        let controller = Arc::new(MigrationController::new(
            targets,
            deps,
            ServiceConfig::from(cfg),
        ));
        Ok(Self { controller })
    }

    /// REST routes under `/migration/v1`.
    pub fn router(&self) -> Router {
        routes::register_routes(Arc::clone(&self.controller))
    }

    /// In-process client implementing the public API.
    pub fn api(&self) -> Arc<dyn MigrationControlApi> {
        Arc::new(MigrationControlLocalClient::new(Arc::clone(&self.controller)))
    }

    /// Stop background work. Idempotent.
    pub fn shutdown(&self) {
        let stats = self.controller.stop_traffic();
        info!(
            requests_sent = stats.requests_sent,
            "Migration control module stopped"
        );
    }
}
