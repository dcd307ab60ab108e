// # Status Probe Trait
//
// Defines the interface for sampling the raw signals the classifier consumes.
//
// ## Implementations
//
// - `ip` / `systemctl` / interface-bound HTTP: `hotspot-probe-linux` crate
// - Scripted doubles in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use hotspot_core::StatusProbe;
//
// async fn show(probe: &dyn StatusProbe) -> hotspot_core::Result<()> {
//     let wg = probe.query_interface("wg0").await?;
//     println!("wg0 present={} ip4={:?}", wg.present, wg.ip4);
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};

/// Observed state of one network interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceStatus {
    /// Interface name
    pub name: String,
    /// Whether the kernel knows the interface
    pub present: bool,
    /// Link flag reported by the kernel
    pub up: bool,
    /// First IPv4 address on the interface
    pub ip4: Option<Ipv4Addr>,
}

impl InterfaceStatus {
    /// Status for an interface that does not exist or could not be queried
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            present: false,
            up: false,
            ip4: None,
        }
    }
}

/// Observed state of one service unit
///
/// `active_state` / `sub_state` mirror the service manager's vocabulary
/// verbatim (e.g. `"active"`, `"running"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub unit: String,
    pub active_state: Option<String>,
    pub sub_state: Option<String>,
    pub description: Option<String>,
}

impl ServiceStatus {
    /// Status for a unit whose state could not be determined
    pub fn unknown(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            active_state: None,
            sub_state: None,
            description: None,
        }
    }

    /// Whether the unit reports `ActiveState=active`
    pub fn is_active(&self) -> bool {
        self.active_state.as_deref() == Some("active")
    }
}

/// Trait for status probe implementations
///
/// Each method is one bounded external query. Implementations report
/// ordinary absence (interface not configured, unit unknown) as data and
/// reserve `Err` for the probe itself failing (tool missing, timeout,
/// unreadable output). Callers in this crate degrade every `Err` to the
/// absent variant, so a failing probe never fails a snapshot.
///
/// # Thread Safety
///
/// Implementations must be thread-safe; the poll loop and concurrent HTTP
/// requests share one instance.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Query presence, link flag and IPv4 address of an interface
    async fn query_interface(&self, name: &str) -> Result<InterfaceStatus, crate::Error>;

    /// Query the activation state of a service unit
    async fn query_service(&self, unit: &str) -> Result<ServiceStatus, crate::Error>;

    /// Resolve the externally visible IP address of traffic leaving `interface`
    ///
    /// Returns `Ok(None)` when the lookup completed but yielded no address.
    async fn query_external_ip(&self, interface: &str) -> Result<Option<IpAddr>, crate::Error>;
}
