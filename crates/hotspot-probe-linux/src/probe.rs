//! `StatusProbe` backed by iproute2, systemd and an HTTP echo service

use crate::command;
use crate::parse::{parse_ipv4_addr, parse_link_up, parse_systemctl_show};
use async_trait::async_trait;
use hotspot_core::config::TimeoutConfig;
use hotspot_core::traits::{InterfaceStatus, ServiceStatus, StatusProbe};
use hotspot_core::{Error, Result};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Plain-text "what is my IP" endpoint
pub const DEFAULT_WAN_IP_URL: &str = "https://ifconfig.me/ip";

/// Probe for a Linux appliance
pub struct SystemProbe {
    /// Bound on each `ip` / `systemctl` call
    command_timeout: Duration,

    /// Bound on each external-IP lookup
    wan_timeout: Duration,

    /// Echo service returning the caller's address as plain text
    wan_url: String,

    /// One HTTP client per egress interface
    clients: Mutex<HashMap<String, reqwest::Client>>,
}

impl SystemProbe {
    pub fn new(command_timeout: Duration, wan_timeout: Duration) -> Self {
        Self {
            command_timeout,
            wan_timeout,
            wan_url: DEFAULT_WAN_IP_URL.to_string(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Create from the configured time bounds
    pub fn from_timeouts(timeouts: &TimeoutConfig) -> Self {
        Self::new(timeouts.probe(), timeouts.wan_ip())
    }

    /// Use a different echo service
    pub fn with_wan_url(mut self, url: impl Into<String>) -> Self {
        self.wan_url = url.into();
        self
    }

    fn client_for(&self, interface: &str) -> Result<reqwest::Client> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| Error::Other("HTTP client cache poisoned".to_string()))?;

        if let Some(client) = clients.get(interface) {
            return Ok(client.clone());
        }

        let builder = reqwest::Client::builder().timeout(self.wan_timeout);

        #[cfg(any(target_os = "linux", target_os = "android", target_os = "fuchsia"))]
        let builder = builder.interface(interface);

        let client = builder
            .build()
            .map_err(|e| Error::http(format!("Failed to build client for {}: {}", interface, e)))?;

        clients.insert(interface.to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl StatusProbe for SystemProbe {
    async fn query_interface(&self, name: &str) -> Result<InterfaceStatus> {
        let link = command::run("ip", ["-o", "link", "show", "dev", name], self.command_timeout).await?;
        if !link.success() {
            debug!("Interface {} not present: {}", name, link.stderr);
            return Ok(InterfaceStatus::absent(name));
        }

        let ip4 = match command::run("ip", ["-4", "-o", "addr", "show", "dev", name], self.command_timeout).await {
            Ok(addr) if addr.success() => parse_ipv4_addr(&addr.stdout),
            Ok(addr) => {
                debug!("ip addr for {} exited with {}", name, addr.code);
                None
            }
            Err(e) => {
                debug!("ip addr for {} failed: {}", name, e);
                None
            }
        };

        Ok(InterfaceStatus {
            name: name.to_string(),
            present: true,
            up: parse_link_up(&link.stdout),
            ip4,
        })
    }

    async fn query_service(&self, unit: &str) -> Result<ServiceStatus> {
        if unit.is_empty() {
            return Ok(ServiceStatus::unknown(unit));
        }

        let out = command::run(
            "systemctl",
            [
                "show",
                unit,
                "--no-page",
                "--property=ActiveState,SubState,Description",
            ],
            self.command_timeout,
        )
        .await?;

        if !out.success() {
            debug!("systemctl show {} exited with {}: {}", unit, out.code, out.stderr);
            return Ok(ServiceStatus::unknown(unit));
        }

        Ok(parse_systemctl_show(unit, &out.stdout))
    }

    async fn query_external_ip(&self, interface: &str) -> Result<Option<IpAddr>> {
        let client = self.client_for(interface)?;

        let response = client
            .get(&self.wan_url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request via {} failed: {}", interface, e)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "Lookup via {} returned {}",
                interface,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        let body = body.trim();
        if body.is_empty() {
            return Ok(None);
        }

        body.parse::<IpAddr>()
            .map(Some)
            .map_err(|_| Error::malformed(format!("Invalid IP address from {}: {}", self.wan_url, body)))
    }
}
