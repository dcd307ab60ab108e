//! Parsers for iproute2 and systemctl output
//!
//! Unexpected shapes yield "no value", never a panic.

use hotspot_core::traits::ServiceStatus;
use std::net::Ipv4Addr;

/// Link flag from `ip -o link show dev <name>`
///
/// True for `state UP` or a standalone `UP` token.
pub fn parse_link_up(link_output: &str) -> bool {
    link_output.contains("state UP") || link_output.split_whitespace().any(|t| t == "UP")
}

/// First IPv4 address from `ip -4 -o addr show dev <name>`
///
/// Expects the one-line layout `<idx>: <name> inet <addr>/<prefix> ...`.
pub fn parse_ipv4_addr(addr_output: &str) -> Option<Ipv4Addr> {
    let line = addr_output.lines().next()?;
    let token = line.split_whitespace().nth(3)?;
    token.split('/').next()?.parse().ok()
}

/// `Key=Value` lines from `systemctl show <unit> --property=...`
///
/// Empty values are treated as absent.
pub fn parse_systemctl_show(unit: &str, output: &str) -> ServiceStatus {
    let mut status = ServiceStatus::unknown(unit);

    for line in output.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = (!value.is_empty()).then(|| value.to_string());
        match key {
            "ActiveState" => status.active_state = value,
            "SubState" => status.sub_state = value,
            "Description" => status.description = value,
            _ => {}
        }
    }

    status
}
