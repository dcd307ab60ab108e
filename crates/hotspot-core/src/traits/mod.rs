//! Core traits for the hotspot monitor
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`StatusProbe`]: Query interfaces, service units and external IPs
//! - [`Notifier`]: Deliver transition alerts
//! - [`Runner`]: Execute the start/stop control scripts

pub mod status_probe;
pub mod notifier;
pub mod runner;

pub use status_probe::{StatusProbe, InterfaceStatus, ServiceStatus};
pub use notifier::{Notifier, Notification, NullNotifier};
pub use runner::{Runner, Action, RunOutput};
