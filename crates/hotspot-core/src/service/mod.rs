//! Read and write paths of the HTTP API
//!
//! - [`StatusService`]: probe → derive → classify, plus WAN IPs from the cache
//! - [`ControlService`]: validate an action, run its script, re-snapshot
//!
//! Both are shared behind `Arc` by the poll loop and concurrent requests.

use crate::cache::WanIpCache;
use crate::config::{InterfaceConfig, MonitorConfig, ServiceConfig};
use crate::error::Result;
use crate::state::snapshot::epoch_seconds;
use crate::state::{Observation, StatusSnapshot};
use crate::traits::{Action, InterfaceStatus, RunOutput, Runner, ServiceStatus, StatusProbe};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Assembles classified status from the probe
pub struct StatusService {
    probe: Arc<dyn StatusProbe>,
    cache: Arc<WanIpCache>,
    interfaces: InterfaceConfig,
    services: ServiceConfig,
}

impl StatusService {
    pub fn new(
        probe: Arc<dyn StatusProbe>,
        cache: Arc<WanIpCache>,
        interfaces: InterfaceConfig,
        services: ServiceConfig,
    ) -> Self {
        Self {
            probe,
            cache,
            interfaces,
            services,
        }
    }

    /// Build a service and its WAN-IP cache from configuration
    pub fn from_config(probe: Arc<dyn StatusProbe>, config: &MonitorConfig) -> Self {
        let cache = Arc::new(WanIpCache::new(
            config.wan_cache_ttl(),
            config.interfaces.lan.clone(),
            config.interfaces.wg.clone(),
        ));
        Self::new(
            probe,
            cache,
            config.interfaces.clone(),
            config.services.clone(),
        )
    }

    pub fn cache(&self) -> &Arc<WanIpCache> {
        &self.cache
    }

    /// Sample all four signals and classify them
    ///
    /// Probe failures degrade to the absent variant; this never fails.
    pub async fn observe(&self) -> Observation {
        let (wg, hotspot, service, hostapd) = tokio::join!(
            self.interface(&self.interfaces.wg),
            self.interface(&self.interfaces.hotspot),
            self.service(&self.services.hotspot_service),
            self.service(&self.services.hostapd),
        );

        Observation::derive(wg, hotspot, service, hostapd)
    }

    /// Full snapshot including cached WAN IPs
    pub async fn snapshot(&self) -> StatusSnapshot {
        let observation = self.observe().await;
        let wan = self.cache.get(self.probe.as_ref()).await;
        StatusSnapshot::assemble(observation, wan, &self.interfaces, epoch_seconds())
    }

    async fn interface(&self, name: &str) -> InterfaceStatus {
        self.probe.query_interface(name).await.unwrap_or_else(|e| {
            warn!("Interface probe for {} failed: {}", name, e);
            InterfaceStatus::absent(name)
        })
    }

    async fn service(&self, unit: &str) -> ServiceStatus {
        if unit.is_empty() {
            return ServiceStatus::unknown(unit);
        }
        self.probe.query_service(unit).await.unwrap_or_else(|e| {
            warn!("Service probe for {} failed: {}", unit, e);
            ServiceStatus::unknown(unit)
        })
    }
}

/// Result of a control request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlOutcome {
    pub action: Action,
    /// Script ran and exited 0
    pub accepted: bool,
    pub output: RunOutput,
    /// Taken after the script finished
    pub snapshot: StatusSnapshot,
}

/// Forwards start/stop requests to the control scripts
pub struct ControlService {
    runner: Arc<dyn Runner>,
    status: Arc<StatusService>,
}

impl ControlService {
    pub fn new(runner: Arc<dyn Runner>, status: Arc<StatusService>) -> Self {
        Self { runner, status }
    }

    /// Validate `action` and run it
    ///
    /// # Errors
    ///
    /// Only [`crate::Error::InvalidInput`], before any script is touched.
    pub async fn run(&self, action: &str) -> Result<ControlOutcome> {
        let action: Action = action.parse()?;
        Ok(self.run_action(action).await)
    }

    /// Run a validated action; runner errors are folded into the output
    pub async fn run_action(&self, action: Action) -> ControlOutcome {
        info!("Running {} script", action);

        let output = match self.runner.run(action).await {
            Ok(output) => output,
            Err(e) => {
                warn!("{} script did not run: {}", action, e);
                RunOutput::failed(e.to_string())
            }
        };

        if output.success() {
            info!("{} script finished", action);
        } else {
            warn!("{} script exited with {}", action, output.exit_code);
        }

        let snapshot = self.status.snapshot().await;

        ControlOutcome {
            action,
            accepted: output.success(),
            output,
            snapshot,
        }
    }
}
