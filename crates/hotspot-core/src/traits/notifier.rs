// # Notifier Trait
//
// Defines the outbound alert channel for state transitions.
//
// ## Implementations
//
// - Discord webhook: `hotspot-notify-discord` crate
// - [`NullNotifier`]: used when no webhook is configured

use async_trait::async_trait;
use tracing::debug;

/// A terse alert, already rendered for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short tag, e.g. `vpn-hotspot-on`
    pub event: String,
    /// Human-readable message
    pub message: String,
}

impl Notification {
    pub fn new(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            message: message.into(),
        }
    }

    /// `[<event>] <message>`
    pub fn content(&self) -> String {
        format!("[{}] {}", self.event, self.message)
    }
}

/// Trait for notifier implementations
///
/// Delivery failures are returned, not retried. The poll loop logs them and
/// carries on; a lost alert never affects monitoring.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single notification
    async fn notify(&self, notification: &Notification) -> Result<(), crate::Error>;

    /// Name used in logs
    fn notifier_name(&self) -> &'static str;
}

/// Notifier that drops everything (notifications disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), crate::Error> {
        debug!("Notifications disabled, dropping {}", notification.content());
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "null"
    }
}
