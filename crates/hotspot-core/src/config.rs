//! Configuration types for the hotspot monitor
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Network interfaces to observe
    #[serde(default)]
    pub interfaces: InterfaceConfig,

    /// Service units to observe
    #[serde(default)]
    pub services: ServiceConfig,

    /// Seconds between poll iterations
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seconds an external-IP lookup stays valid
    #[serde(default = "default_wan_cache_ttl_secs")]
    pub wan_cache_ttl_secs: u64,

    /// HTTP API listener
    #[serde(default)]
    pub webui: WebUiConfig,

    /// Control scripts
    #[serde(default)]
    pub scripts: ScriptConfig,

    /// Per-operation time bounds
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Webhook destination; `None` disables notifications
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl MonitorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            interfaces: InterfaceConfig::default(),
            services: ServiceConfig::default(),
            poll_interval_secs: default_poll_interval_secs(),
            wan_cache_ttl_secs: default_wan_cache_ttl_secs(),
            webui: WebUiConfig::default(),
            scripts: ScriptConfig::default(),
            timeouts: TimeoutConfig::default(),
            webhook_url: None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }

        if self.webui.port == 0 {
            return Err(crate::Error::config("Web UI port must be > 0"));
        }

        if let Some(url) = &self.webhook_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "Webhook URL must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }

        self.interfaces.validate()?;
        self.timeouts.validate()?;

        Ok(())
    }

    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// WAN cache TTL as a duration
    pub fn wan_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.wan_cache_ttl_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Interface names for the three uplinks the appliance cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Access-point interface (e.g., "wlan0")
    #[serde(default = "default_hotspot_interface")]
    pub hotspot: String,

    /// Wired uplink (e.g., "eth0")
    #[serde(default = "default_lan_interface")]
    pub lan: String,

    /// WireGuard tunnel (e.g., "wg0")
    #[serde(default = "default_wg_interface")]
    pub wg: String,
}

impl InterfaceConfig {
    fn validate(&self) -> Result<(), crate::Error> {
        for (label, name) in [("hotspot", &self.hotspot), ("lan", &self.lan), ("wg", &self.wg)] {
            if name.trim().is_empty() {
                return Err(crate::Error::config(format!(
                    "{} interface name cannot be empty",
                    label
                )));
            }
        }
        Ok(())
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            hotspot: default_hotspot_interface(),
            lan: default_lan_interface(),
            wg: default_wg_interface(),
        }
    }
}

/// Service units to query
///
/// An empty unit name is allowed; it is reported as unknown without probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Unit that brings the VPN + hotspot stack up
    #[serde(default = "default_hotspot_service")]
    pub hotspot_service: String,

    /// Access-point daemon unit
    #[serde(default = "default_hostapd_service")]
    pub hostapd: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            hotspot_service: default_hotspot_service(),
            hostapd: default_hostapd_service(),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebUiConfig {
    /// Bind host
    #[serde(default = "default_webui_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_webui_port")]
    pub port: u16,
}

impl WebUiConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for WebUiConfig {
    fn default() -> Self {
        Self {
            host: default_webui_host(),
            port: default_webui_port(),
        }
    }
}

/// Paths of the external start/stop scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default = "default_start_script")]
    pub start: PathBuf,

    #[serde(default = "default_stop_script")]
    pub stop: PathBuf,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            start: default_start_script(),
            stop: default_stop_script(),
        }
    }
}

/// Time bounds for external operations (in seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// `ip` and `systemctl` invocations
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_secs: u64,

    /// External-IP lookups
    #[serde(default = "default_wan_ip_timeout_secs")]
    pub wan_ip_secs: u64,

    /// Control script execution
    #[serde(default = "default_script_timeout_secs")]
    pub script_secs: u64,

    /// Webhook delivery
    #[serde(default = "default_notify_timeout_secs")]
    pub notify_secs: u64,
}

impl TimeoutConfig {
    fn validate(&self) -> Result<(), crate::Error> {
        if self.probe_secs == 0
            || self.wan_ip_secs == 0
            || self.script_secs == 0
            || self.notify_secs == 0
        {
            return Err(crate::Error::config("Timeouts must be > 0"));
        }
        Ok(())
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }

    pub fn wan_ip(&self) -> Duration {
        Duration::from_secs(self.wan_ip_secs)
    }

    pub fn script(&self) -> Duration {
        Duration::from_secs(self.script_secs)
    }

    pub fn notify(&self) -> Duration {
        Duration::from_secs(self.notify_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_secs: default_probe_timeout_secs(),
            wan_ip_secs: default_wan_ip_timeout_secs(),
            script_secs: default_script_timeout_secs(),
            notify_secs: default_notify_timeout_secs(),
        }
    }
}

fn default_hotspot_interface() -> String {
    "wlan0".to_string()
}

fn default_lan_interface() -> String {
    "eth0".to_string()
}

fn default_wg_interface() -> String {
    "wg0".to_string()
}

fn default_hotspot_service() -> String {
    "pi-vpn-hotspot.service".to_string()
}

fn default_hostapd_service() -> String {
    "hostapd".to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_wan_cache_ttl_secs() -> u64 {
    60
}

fn default_webui_host() -> String {
    "0.0.0.0".to_string()
}

fn default_webui_port() -> u16 {
    8090
}

fn default_start_script() -> PathBuf {
    PathBuf::from("./start-hotspot-pizero")
}

fn default_stop_script() -> PathBuf {
    PathBuf::from("./stop-hotspot-pizero")
}

fn default_probe_timeout_secs() -> u64 {
    8
}

fn default_wan_ip_timeout_secs() -> u64 {
    4
}

fn default_script_timeout_secs() -> u64 {
    60
}

fn default_notify_timeout_secs() -> u64 {
    10
}
