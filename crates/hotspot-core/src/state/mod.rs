//! State derivation and classification
//!
//! Raw probe results flow through exactly one path to an [`OverallState`]:
//!
//! ```text
//! InterfaceStatus(wg) ─────────────► vpn_up ─────┐
//! InterfaceStatus(wlan) ─┐                       ├─► classify() ─► OverallState
//! ServiceStatus(hostapd) ┴─────────► hotspot_up ─┘
//! ```
//!
//! [`Observation`] is the only public way to obtain a classified state from
//! probe output, so the state can never be asserted without the derivation.

pub mod snapshot;
pub mod watcher;

pub use snapshot::{HostapdSnapshot, HotspotSnapshot, LanSnapshot, StatusSnapshot, VpnSnapshot};
pub use watcher::{Transition, TransitionWatcher};

use crate::traits::{InterfaceStatus, ServiceStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-way summary of both monitored subsystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallState {
    /// VPN and hotspot both up
    On,
    /// Neither up
    Off,
    /// Exactly one up
    Partial,
}

impl OverallState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallState::On => "on",
            OverallState::Off => "off",
            OverallState::Partial => "partial",
        }
    }
}

impl fmt::Display for OverallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the two derived signals
///
/// Total over the 2-bit input space; nothing else influences the result.
pub fn classify(vpn_up: bool, hotspot_up: bool) -> OverallState {
    match (vpn_up, hotspot_up) {
        (true, true) => OverallState::On,
        (false, false) => OverallState::Off,
        (true, false) | (false, true) => OverallState::Partial,
    }
}

/// VPN leg is up when the tunnel exists and carries an IPv4 address
///
/// The link flag is ignored: tunnel interfaces can hold an address before
/// the flag flips.
pub fn vpn_up(wg: &InterfaceStatus) -> bool {
    wg.present && wg.ip4.is_some()
}

/// Hotspot leg is up when the AP interface has an IPv4 address and the
/// access-point daemon reports `active`
pub fn hotspot_up(hotspot: &InterfaceStatus, hostapd: &ServiceStatus) -> bool {
    hotspot.present && hotspot.ip4.is_some() && hostapd.is_active()
}

/// One complete, classified sample of the appliance
///
/// Constructed fresh per poll or request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// WireGuard tunnel interface
    pub vpn: InterfaceStatus,
    /// Access-point interface
    pub hotspot: InterfaceStatus,
    /// VPN/hotspot orchestration unit
    pub service: ServiceStatus,
    /// Access-point daemon unit
    pub hostapd: ServiceStatus,
    vpn_up: bool,
    hotspot_up: bool,
    overall: OverallState,
}

impl Observation {
    /// Derive both signals and classify them
    pub fn derive(
        vpn: InterfaceStatus,
        hotspot: InterfaceStatus,
        service: ServiceStatus,
        hostapd: ServiceStatus,
    ) -> Self {
        let vpn_up = vpn_up(&vpn);
        let hotspot_up = hotspot_up(&hotspot, &hostapd);

        Self {
            vpn,
            hotspot,
            service,
            hostapd,
            vpn_up,
            hotspot_up,
            overall: classify(vpn_up, hotspot_up),
        }
    }

    pub fn vpn_up(&self) -> bool {
        self.vpn_up
    }

    pub fn hotspot_up(&self) -> bool {
        self.hotspot_up
    }

    pub fn overall(&self) -> OverallState {
        self.overall
    }
}
