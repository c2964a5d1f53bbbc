//! Migration control module configuration.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Migration control module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationControlConfig {
    /// Known migration targets. Requests naming any other target are rejected.
    pub targets: Vec<String>,

    // === Collaborators ===
    /// Base URL of the Gateway admin API.
    pub gateway_url: String,
    /// Base URL of the Arbiter.
    pub arbiter_url: String,
    /// Bound on every Gateway and Arbiter call, in milliseconds.
    pub upstream_timeout_ms: u64,
    /// Forward weight changes to the Gateway's `/admin/set-weight`.
    pub push_weights_to_gateway: bool,

    // === Deployment lifecycle ===
    /// Location of the deployment status document.
    pub deployment_status_path: String,

    // === Synthetic traffic ===
    /// Delay between two synthetic requests, in milliseconds.
    pub traffic_interval_ms: u64,
    /// Timeout of a single synthetic request, in milliseconds.
    pub traffic_request_timeout_ms: u64,
}

impl Default for MigrationControlConfig {
    fn default() -> Self {
        Self {
            targets: vec!["python".to_owned(), "php".to_owned()],

            gateway_url: "http://localhost:8082".to_owned(),
            arbiter_url: "http://localhost:5000".to_owned(),
            upstream_timeout_ms: 3_000,
            push_weights_to_gateway: true,

            deployment_status_path: "deployment-status.json".to_owned(),

            traffic_interval_ms: 1_000,
            traffic_request_timeout_ms: 5_000,
        }
    }
}

impl MigrationControlConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn traffic_interval(&self) -> Duration {
        Duration::from_millis(self.traffic_interval_ms)
    }

    pub fn traffic_request_timeout(&self) -> Duration {
        Duration::from_millis(self.traffic_request_timeout_ms)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.targets.is_empty() {
            anyhow::bail!("migration.targets must name at least one target");
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.trim().is_empty() {
                anyhow::bail!("migration.targets contains an empty name");
            }
            if !seen.insert(target.as_str()) {
                anyhow::bail!("migration.targets contains '{target}' twice");
            }
        }

        Url::parse(&self.gateway_url)
            .map_err(|e| anyhow::anyhow!("migration.gateway_url '{}': {e}", self.gateway_url))?;
        Url::parse(&self.arbiter_url)
            .map_err(|e| anyhow::anyhow!("migration.arbiter_url '{}': {e}", self.arbiter_url))?;

        if self.upstream_timeout_ms == 0 {
            anyhow::bail!("migration.upstream_timeout_ms must be positive");
        }
        if self.traffic_interval_ms == 0 {
            anyhow::bail!("migration.traffic_interval_ms must be positive");
        }
        if self.traffic_request_timeout_ms == 0 {
            anyhow::bail!("migration.traffic_request_timeout_ms must be positive");
        }
        if self.deployment_status_path.trim().is_empty() {
            anyhow::bail!("migration.deployment_status_path must not be empty");
        }
        Ok(())
    }
}
