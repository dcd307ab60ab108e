// # hotspot-core
//
// Core library for the VPN/hotspot state monitor.
//
// ## Architecture Overview
//
// The appliance keeps an outbound VPN tunnel and an inbound wireless access
// point up at the same time. This library turns noisy, independently sampled
// signals about both into one classified state:
//
// - **StatusProbe**: Trait for querying interfaces, services and external IPs
// - **Notifier**: Trait for delivering transition alerts
// - **Runner**: Trait for executing the start/stop control scripts
// - **classify / TransitionWatcher**: Pure classification and edge detection
// - **WanIpCache**: TTL cache for external-IP lookups, shared by all readers
// - **StatusService / ControlService**: Read and write paths of the HTTP API
// - **MonitorEngine**: Poll loop that drives probes, watcher and notifier
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from OS probes
// 2. **Degrade, don't fail**: A failed probe is an absent value, never a crash
// 3. **Edge-triggered**: One notification per genuine state change
// 4. **Library-First**: The daemon is a thin wiring layer over this crate

pub mod traits;
pub mod engine;
pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod state;

// Re-export core types for convenience
pub use traits::{StatusProbe, Notifier, Runner, NullNotifier};
pub use engine::{MonitorEngine, EngineEvent};
pub use cache::{WanIpCache, WanIps};
pub use config::MonitorConfig;
pub use error::{Error, Result};
pub use service::{ControlOutcome, ControlService, StatusService};
pub use state::{classify, Observation, OverallState, TransitionWatcher};
