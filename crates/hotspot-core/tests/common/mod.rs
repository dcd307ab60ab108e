//! Test doubles and common utilities for the contract tests
//!
//! The doubles record every call so tests can assert on probe traffic,
//! notifications and script invocations without touching the OS.

#![allow(dead_code)]

use hotspot_core::config::MonitorConfig;
use hotspot_core::error::{Error, Result};
use hotspot_core::traits::{
    Action, InterfaceStatus, Notification, Notifier, RunOutput, Runner, ServiceStatus,
    StatusProbe,
};
use hotspot_core::{OverallState, StatusService};
use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const WG: &str = "wg0";
pub const WLAN: &str = "wlan0";
pub const LAN: &str = "eth0";
pub const HOSTAPD: &str = "hostapd";
pub const HOTSPOT_SERVICE: &str = "pi-vpn-hotspot.service";

pub const WG_IP: Ipv4Addr = Ipv4Addr::new(10, 6, 0, 2);
pub const WLAN_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

/// A probe whose answers are set by the test
#[derive(Default)]
pub struct ScriptedProbe {
    interfaces: Mutex<HashMap<String, InterfaceStatus>>,
    services: Mutex<HashMap<String, ServiceStatus>>,
    failing_interfaces: Mutex<HashSet<String>>,
    wan: Mutex<HashMap<String, Option<IpAddr>>>,
    failing_wan: Mutex<HashSet<String>>,
    /// Simulated latency of each external-IP lookup
    wan_delay: Mutex<Duration>,
    /// Panic inside the next interface query
    panic_next: AtomicBool,
    interface_calls: AtomicUsize,
    service_calls: AtomicUsize,
    wan_calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Configure wg0 / wlan0 / hostapd so the appliance classifies as `state`
    pub fn set_state(&self, state: OverallState) {
        let (vpn, hotspot) = match state {
            OverallState::On => (true, true),
            OverallState::Off => (false, false),
            OverallState::Partial => (true, false),
        };
        self.set_legs(vpn, hotspot);
    }

    /// Configure each leg independently
    pub fn set_legs(&self, vpn_up: bool, hotspot_up: bool) {
        self.set_interface(InterfaceStatus {
            name: WG.to_string(),
            present: vpn_up,
            up: vpn_up,
            ip4: vpn_up.then_some(WG_IP),
        });
        self.set_interface(InterfaceStatus {
            name: WLAN.to_string(),
            present: true,
            up: true,
            ip4: Some(WLAN_IP),
        });
        self.set_service(service(HOSTAPD, if hotspot_up { "active" } else { "inactive" }));
        self.set_service(service(HOTSPOT_SERVICE, if vpn_up || hotspot_up { "active" } else { "inactive" }));
    }

    pub fn set_interface(&self, status: InterfaceStatus) {
        self.interfaces
            .lock()
            .unwrap()
            .insert(status.name.clone(), status);
    }

    pub fn set_service(&self, status: ServiceStatus) {
        self.services
            .lock()
            .unwrap()
            .insert(status.unit.clone(), status);
    }

    /// Make interface queries for `name` time out
    pub fn fail_interface(&self, name: &str) {
        self.failing_interfaces
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub fn set_wan(&self, interface: &str, ip: Option<IpAddr>) {
        self.wan.lock().unwrap().insert(interface.to_string(), ip);
    }

    /// Make external-IP lookups via `interface` fail
    pub fn fail_wan(&self, interface: &str) {
        self.failing_wan
            .lock()
            .unwrap()
            .insert(interface.to_string());
    }

    pub fn set_wan_delay(&self, delay: Duration) {
        *self.wan_delay.lock().unwrap() = delay;
    }

    pub fn panic_on_next_query(&self) {
        self.panic_next.store(true, Ordering::SeqCst);
    }

    pub fn interface_calls(&self) -> usize {
        self.interface_calls.load(Ordering::SeqCst)
    }

    pub fn service_calls(&self) -> usize {
        self.service_calls.load(Ordering::SeqCst)
    }

    pub fn wan_calls(&self) -> usize {
        self.wan_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StatusProbe for ScriptedProbe {
    async fn query_interface(&self, name: &str) -> Result<InterfaceStatus> {
        self.interface_calls.fetch_add(1, Ordering::SeqCst);

        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("scripted probe panic");
        }

        if self.failing_interfaces.lock().unwrap().contains(name) {
            return Err(Error::timeout(format!("ip -o link show dev {}", name)));
        }

        Ok(self
            .interfaces
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| InterfaceStatus::absent(name)))
    }

    async fn query_service(&self, unit: &str) -> Result<ServiceStatus> {
        self.service_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .services
            .lock()
            .unwrap()
            .get(unit)
            .cloned()
            .unwrap_or_else(|| ServiceStatus::unknown(unit)))
    }

    async fn query_external_ip(&self, interface: &str) -> Result<Option<IpAddr>> {
        self.wan_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.wan_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing_wan.lock().unwrap().contains(interface) {
            return Err(Error::probe_unavailable("ifconfig.me unreachable"));
        }

        Ok(self.wan.lock().unwrap().get(interface).copied().flatten())
    }
}

pub fn service(unit: &str, active_state: &str) -> ServiceStatus {
    ServiceStatus {
        unit: unit.to_string(),
        active_state: Some(active_state.to_string()),
        sub_state: Some(if active_state == "active" { "running" } else { "dead" }.to_string()),
        description: None,
    }
}

/// A notifier that records everything and can be told to fail
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: AtomicBool,
    /// Never completes; exercises the notify timeout
    hang: AtomicBool,
    panic: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        Arc::new(notifier)
    }

    pub fn hanging() -> Arc<Self> {
        let notifier = Self::default();
        notifier.hang.store(true, Ordering::SeqCst);
        Arc::new(notifier)
    }

    pub fn panicking() -> Arc<Self> {
        let notifier = Self::default();
        notifier.panic.store(true, Ordering::SeqCst);
        Arc::new(notifier)
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());

        if self.panic.load(Ordering::SeqCst) {
            panic!("notifier bug");
        }
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::notification("webhook returned 500"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// What the recording runner does when invoked
pub enum RunnerBehavior {
    /// Exit with this code after switching the probe to `state`
    Exit { code: i32, state: Option<OverallState> },
    /// Report the script as missing
    Missing,
}

/// A runner that records invocations and mutates the scripted probe
pub struct RecordingRunner {
    probe: Arc<ScriptedProbe>,
    behavior: RunnerBehavior,
    calls: Mutex<Vec<Action>>,
}

impl RecordingRunner {
    pub fn new(probe: Arc<ScriptedProbe>, behavior: RunnerBehavior) -> Arc<Self> {
        Arc::new(Self {
            probe,
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Action> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Runner for RecordingRunner {
    async fn run(&self, action: Action) -> Result<RunOutput> {
        self.calls.lock().unwrap().push(action);

        match &self.behavior {
            RunnerBehavior::Exit { code, state } => {
                if let Some(state) = state {
                    self.probe.set_state(*state);
                }
                Ok(RunOutput {
                    exit_code: *code,
                    stdout: format!("{} done", action),
                    stderr: String::new(),
                })
            }
            RunnerBehavior::Missing => Err(Error::script_missing(format!(
                "./{}-hotspot-pizero",
                action
            ))),
        }
    }
}

/// Default config with a short notify timeout for tests
pub fn test_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.timeouts.notify_secs = 1;
    config
}

/// Status service over a scripted probe
pub fn status_service(probe: &Arc<ScriptedProbe>) -> Arc<StatusService> {
    Arc::new(StatusService::from_config(probe.clone(), &test_config()))
}
