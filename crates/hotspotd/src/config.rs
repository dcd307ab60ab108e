//! Environment configuration for hotspotd
//!
//! Configuration is via environment variables ONLY.

use anyhow::Result;
use hotspot_core::MonitorConfig;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut monitor = MonitorConfig::default();

        if let Some(v) = lookup("HOTSPOT_INTERFACE") {
            monitor.interfaces.hotspot = v;
        }
        if let Some(v) = lookup("LAN_INTERFACE") {
            monitor.interfaces.lan = v;
        }
        if let Some(v) = lookup("WG_INTERFACE") {
            monitor.interfaces.wg = v;
        }
        if let Some(v) = lookup("HOTSPOT_SERVICE_NAME") {
            monitor.services.hotspot_service = v;
        }
        if let Some(v) = lookup("HOSTAPD_SERVICE") {
            monitor.services.hostapd = v;
        }
        if let Some(v) = parse_var(&lookup, "STATE_POLL_INTERVAL")? {
            monitor.poll_interval_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "WAN_CACHE_TTL")? {
            monitor.wan_cache_ttl_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "WEBUI_PORT")? {
            monitor.webui.port = v;
        }
        if let Some(v) = lookup("WEBUI_HOST") {
            monitor.webui.host = v;
        }
        if let Some(v) = lookup("HOTSPOT_START_SCRIPT") {
            monitor.scripts.start = PathBuf::from(v);
        }
        if let Some(v) = lookup("HOTSPOT_STOP_SCRIPT") {
            monitor.scripts.stop = PathBuf::from(v);
        }

        monitor.webhook_url = lookup("DISCORD_WEBHOOK_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            monitor,
            log_level: lookup("HOTSPOT_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.monitor
            .validate()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if self.tracing_level().is_none() {
            anyhow::bail!(
                "HOTSPOT_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    pub fn tracing_level(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} must be a number. Got '{}': {}", key, raw, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.monitor.interfaces.hotspot, "wlan0");
        assert_eq!(config.monitor.poll_interval_secs, 10);
        assert_eq!(config.monitor.webui.port, 8090);
        assert_eq!(config.monitor.wan_cache_ttl_secs, 60);
        assert!(config.monitor.webhook_url.is_none());
        assert_eq!(config.tracing_level(), Some(Level::INFO));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("HOTSPOT_INTERFACE", "wlan1"),
            ("WG_INTERFACE", "wg-out"),
            ("HOSTAPD_SERVICE", "hostapd@wlan1"),
            ("STATE_POLL_INTERVAL", "5"),
            ("WEBUI_PORT", "9000"),
            ("WAN_CACHE_TTL", " 120 "),
            ("HOTSPOT_START_SCRIPT", "/opt/pi/start"),
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/x"),
            ("HOTSPOT_LOG_LEVEL", "DEBUG"),
        ])
        .unwrap();

        assert_eq!(config.monitor.interfaces.hotspot, "wlan1");
        assert_eq!(config.monitor.interfaces.wg, "wg-out");
        assert_eq!(config.monitor.services.hostapd, "hostapd@wlan1");
        assert_eq!(config.monitor.poll_interval_secs, 5);
        assert_eq!(config.monitor.webui.port, 9000);
        assert_eq!(config.monitor.wan_cache_ttl_secs, 120);
        assert_eq!(config.monitor.scripts.start, PathBuf::from("/opt/pi/start"));
        assert!(config.monitor.webhook_url.is_some());
        assert_eq!(config.tracing_level(), Some(Level::DEBUG));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_webhook_disables_notifications() {
        let config = load(&[("DISCORD_WEBHOOK_URL", "   ")]).unwrap();
        assert!(config.monitor.webhook_url.is_none());
    }

    #[test]
    fn unparseable_number_is_an_error() {
        assert!(load(&[("STATE_POLL_INTERVAL", "ten")]).is_err());
        assert!(load(&[("WEBUI_PORT", "70000")]).is_err());
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let config = load(&[("HOTSPOT_LOG_LEVEL", "verbose")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let config = load(&[("STATE_POLL_INTERVAL", "0")]).unwrap();
        assert!(config.validate().is_err());
    }
}
