//! Contract Test: WAN-IP Cache
//!
//! This test verifies that external-IP lookups are bounded by the TTL and
//! shared across concurrent callers. Time is driven by tokio's paused clock.
//!
//! Constraints verified:
//! - Calls within TTL issue zero lookups
//! - Calls after TTL issue exactly one round (two lookups)
//! - Failed legs are cached as None and not retried before expiry
//! - Concurrent cache misses share one in-flight round (single-flight)

mod common;

use common::*;
use hotspot_core::WanIpCache;
use std::net::IpAddr;
use std::time::Duration;

fn lan_ip() -> IpAddr {
    "203.0.113.7".parse().unwrap()
}

fn vpn_ip() -> IpAddr {
    "198.51.100.20".parse().unwrap()
}

#[tokio::test(start_paused = true)]
async fn memoizes_within_ttl() {
    let probe = ScriptedProbe::new();
    probe.set_wan(LAN, Some(lan_ip()));
    probe.set_wan(WG, Some(vpn_ip()));
    let cache = WanIpCache::new(Duration::from_secs(60), LAN, WG);

    let first = cache.get(probe.as_ref()).await;
    assert_eq!(first.lan_ip, Some(lan_ip()));
    assert_eq!(first.vpn_ip, Some(vpn_ip()));
    assert_eq!(probe.wan_calls(), 2);

    tokio::time::advance(Duration::from_secs(59)).await;
    probe.set_wan(LAN, None);

    let second = cache.get(probe.as_ref()).await;
    assert_eq!(second, first, "cached pair returned within TTL");
    assert_eq!(probe.wan_calls(), 2, "no lookups within TTL");
}

#[tokio::test(start_paused = true)]
async fn refreshes_after_ttl() {
    let probe = ScriptedProbe::new();
    probe.set_wan(LAN, Some(lan_ip()));
    let cache = WanIpCache::new(Duration::from_secs(60), LAN, WG);

    cache.get(probe.as_ref()).await;
    assert_eq!(probe.wan_calls(), 2);

    tokio::time::advance(Duration::from_secs(60)).await;
    probe.set_wan(WG, Some(vpn_ip()));

    let refreshed = cache.get(probe.as_ref()).await;
    assert_eq!(probe.wan_calls(), 4);
    assert_eq!(refreshed.vpn_ip, Some(vpn_ip()));

    cache.get(probe.as_ref()).await;
    assert_eq!(probe.wan_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn failed_leg_is_cached_until_expiry() {
    let probe = ScriptedProbe::new();
    probe.set_wan(LAN, Some(lan_ip()));
    probe.fail_wan(WG);
    let cache = WanIpCache::new(Duration::from_secs(60), LAN, WG);

    let first = cache.get(probe.as_ref()).await;
    assert_eq!(first.lan_ip, Some(lan_ip()));
    assert_eq!(first.vpn_ip, None);

    tokio::time::advance(Duration::from_secs(30)).await;
    let second = cache.get(probe.as_ref()).await;
    assert_eq!(second.vpn_ip, None);
    assert_eq!(probe.wan_calls(), 2, "failed leg not retried before TTL");

    let entry = cache.peek().await.expect("entry present");
    assert_eq!(entry.ips, first);
}

#[tokio::test(start_paused = true)]
async fn concurrent_misses_share_one_round() {
    let probe = ScriptedProbe::new();
    probe.set_state(hotspot_core::OverallState::On);
    probe.set_wan(LAN, Some(lan_ip()));
    probe.set_wan(WG, Some(vpn_ip()));
    probe.set_wan_delay(Duration::from_millis(500));
    let status = status_service(&probe);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let status = status.clone();
            tokio::spawn(async move { status.snapshot().await })
        })
        .collect();

    for handle in handles {
        let snapshot = handle.await.expect("snapshot task completes");
        assert_eq!(snapshot.lan.wan_ip, Some(lan_ip()));
        assert_eq!(snapshot.vpn.wan_ip, Some(vpn_ip()));
    }

    assert_eq!(probe.wan_calls(), 2, "one round of lookups for all callers");
}
