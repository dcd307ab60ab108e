//! TTL cache for external-IP lookups
//!
//! Bounds outbound lookup traffic: within the TTL every caller gets the
//! memoized pair with zero probes. On expiry both uplinks are queried once
//! and the entry is replaced wholesale, including legs that failed.
//!
//! ## Concurrency
//!
//! The entry lives behind an async mutex that is held for the duration of
//! a refresh. Callers arriving during a refresh queue on the lock and then
//! observe the fresh entry, so overlapping cache misses share one round of
//! lookups (single-flight).

use crate::traits::StatusProbe;
use serde::Serialize;
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// External addresses of the two uplinks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WanIps {
    pub lan_ip: Option<IpAddr>,
    pub vpn_ip: Option<IpAddr>,
}

/// Memoized lookup result
#[derive(Debug, Clone, Copy)]
pub struct WanIpCacheEntry {
    pub ips: WanIps,
    pub fetched_at: Instant,
}

/// Injectable, explicitly owned WAN-IP cache
#[derive(Debug)]
pub struct WanIpCache {
    ttl: Duration,
    lan_interface: String,
    vpn_interface: String,
    entry: Mutex<Option<WanIpCacheEntry>>,
}

impl WanIpCache {
    /// Create an empty cache; the first `get()` always refreshes
    pub fn new(ttl: Duration, lan_interface: impl Into<String>, vpn_interface: impl Into<String>) -> Self {
        Self {
            ttl,
            lan_interface: lan_interface.into(),
            vpn_interface: vpn_interface.into(),
            entry: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached pair, refreshing it first if older than the TTL
    pub async fn get(&self, probe: &dyn StatusProbe) -> WanIps {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref()
            && cached.fetched_at.elapsed() < self.ttl
        {
            return cached.ips;
        }

        debug!(
            "Refreshing WAN IPs (lan={}, vpn={})",
            self.lan_interface, self.vpn_interface
        );

        let (lan_ip, vpn_ip) = tokio::join!(
            lookup(probe, &self.lan_interface),
            lookup(probe, &self.vpn_interface),
        );

        let ips = WanIps { lan_ip, vpn_ip };
        *entry = Some(WanIpCacheEntry {
            ips,
            fetched_at: Instant::now(),
        });
        ips
    }

    /// Current entry without refreshing
    pub async fn peek(&self) -> Option<WanIpCacheEntry> {
        *self.entry.lock().await
    }
}

async fn lookup(probe: &dyn StatusProbe, interface: &str) -> Option<IpAddr> {
    match probe.query_external_ip(interface).await {
        Ok(ip) => ip,
        Err(e) => {
            warn!("External IP lookup via {} failed: {}", interface, e);
            None
        }
    }
}
