//! Serializable status payload served by `GET /api/status`

use super::{Observation, OverallState};
use crate::cache::WanIps;
use crate::config::InterfaceConfig;
use crate::traits::ServiceStatus;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VpnSnapshot {
    pub interface: String,
    pub up: bool,
    pub ip4: Option<Ipv4Addr>,
    pub wan_ip: Option<IpAddr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostapdSnapshot {
    pub unit: String,
    pub active_state: Option<String>,
    pub sub_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotSnapshot {
    pub interface: String,
    pub up: bool,
    pub ip4: Option<Ipv4Addr>,
    pub hostapd: HostapdSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanSnapshot {
    pub interface: String,
    pub wan_ip: Option<IpAddr>,
}

/// Read-only view of the appliance at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub vpn: VpnSnapshot,
    pub hotspot: HotspotSnapshot,
    pub lan: LanSnapshot,
    pub service: ServiceStatus,
    pub overall_state: OverallState,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

impl StatusSnapshot {
    /// Assemble from a classified observation and the cached WAN addresses
    pub fn assemble(
        observation: Observation,
        wan: WanIps,
        interfaces: &InterfaceConfig,
        timestamp: f64,
    ) -> Self {
        let overall_state = observation.overall();
        let vpn_up = observation.vpn_up();
        let hotspot_up = observation.hotspot_up();

        Self {
            vpn: VpnSnapshot {
                interface: interfaces.wg.clone(),
                up: vpn_up,
                ip4: observation.vpn.ip4,
                wan_ip: wan.vpn_ip,
            },
            hotspot: HotspotSnapshot {
                interface: interfaces.hotspot.clone(),
                up: hotspot_up,
                ip4: observation.hotspot.ip4,
                hostapd: HostapdSnapshot {
                    unit: observation.hostapd.unit,
                    active_state: observation.hostapd.active_state,
                    sub_state: observation.hostapd.sub_state,
                },
            },
            lan: LanSnapshot {
                interface: interfaces.lan.clone(),
                wan_ip: wan.lan_ip,
            },
            service: observation.service,
            overall_state,
            timestamp,
        }
    }
}

/// Current wall-clock time as fractional epoch seconds
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
