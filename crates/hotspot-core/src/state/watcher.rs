//! Edge-triggered transition detection

use super::{Observation, OverallState};
use crate::traits::Notification;

/// Event tag for a transition into [`OverallState::On`]
pub const EVENT_ON: &str = "vpn-hotspot-on";

/// Event tag for any other transition (off or degraded)
pub const EVENT_OFF: &str = "vpn-hotspot-off";

/// A notification-worthy change of the overall state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: OverallState,
    pub to: OverallState,
    /// One-line summary of the observation that caused the change
    pub summary: String,
}

impl Transition {
    /// Whether this is an "on" event; everything else is off/degraded
    pub fn is_on(&self) -> bool {
        self.to == OverallState::On
    }

    pub fn event(&self) -> &'static str {
        if self.is_on() { EVENT_ON } else { EVENT_OFF }
    }

    /// Render as an outbound notification
    pub fn to_notification(&self) -> Notification {
        Notification::new(self.event(), self.summary.clone())
    }
}

/// Holds the last classified state and reports genuine changes
///
/// States: uninitialized → {on, off, partial}. The first observation is
/// adopted silently; afterwards only a differing state yields a
/// [`Transition`]. Repeated identical observations never do.
#[derive(Debug, Default)]
pub struct TransitionWatcher {
    last: Option<OverallState>,
}

impl TransitionWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last adopted state, `None` until the first observation
    pub fn current(&self) -> Option<OverallState> {
        self.last
    }

    /// Feed one observation
    pub fn observe(&mut self, observation: &Observation) -> Option<Transition> {
        let next = observation.overall();

        match self.last.replace(next) {
            None => None,
            Some(prev) if prev == next => None,
            Some(prev) => Some(Transition {
                from: prev,
                to: next,
                summary: summarize(observation),
            }),
        }
    }
}

fn summarize(observation: &Observation) -> String {
    fn or_none<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_else(|| "none".to_string())
    }

    format!(
        "VPN/hotspot is now {} (service={}/{}, wg_ip={}, hotspot_ip={})",
        observation.overall().as_str().to_uppercase(),
        or_none(observation.service.active_state.as_deref()),
        or_none(observation.service.sub_state.as_deref()),
        or_none(observation.vpn.ip4),
        or_none(observation.hotspot.ip4),
    )
}
