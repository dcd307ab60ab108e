//! Poll loop
//!
//! The MonitorEngine is responsible for:
//! - Sampling the appliance on a fixed interval
//! - Classifying each sample and feeding the transition watcher
//! - Forwarding transitions to the notifier
//! - Containing every per-iteration failure so the loop never dies
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  tick   ┌───────────────┐  Observation  ┌───────────────────┐
//! │ IntervalStream│───────►│ StatusService │──────────────►│ TransitionWatcher │
//! └──────────────┘         └───────────────┘               └───────────────────┘
//!                                                                   │ Transition
//!                                         ┌─────────────┐           │
//!                                         │  Notifier   │◄──────────┘
//!                                         └─────────────┘
//! ```
//!
//! ## Pacing
//!
//! The first iteration runs immediately, then one per interval. There is no
//! backoff and no retry: a failed probe is an absent value until the next
//! tick.

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::service::StatusService;
use crate::state::{OverallState, Transition, TransitionWatcher};
use crate::traits::Notifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, error, info, warn};

/// Capacity of the engine event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the MonitorEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Loop started
    Started { interval: Duration },

    /// One iteration classified the appliance
    StateObserved { state: OverallState },

    /// Classified state changed
    TransitionDetected {
        from: OverallState,
        to: OverallState,
    },

    /// Notifier accepted the alert
    NotificationSent { event: String },

    /// Notifier failed or timed out (monitoring continues)
    NotificationFailed { event: String, error: String },

    /// An iteration aborted before classification
    IterationFailed { error: String },

    /// Loop stopped
    Stopped { reason: String },
}

/// Drives probe → classify → watch → notify on a fixed interval
///
/// ## Lifecycle
///
/// 1. Create with [`MonitorEngine::new()`]
/// 2. Start with [`MonitorEngine::run()`]
/// 3. Engine runs until the process is interrupted
///
/// The transition watcher is owned exclusively by the engine; iterations
/// never overlap.
pub struct MonitorEngine {
    /// Shared status read path
    status: Arc<StatusService>,

    /// Outbound alerts
    notifier: Arc<dyn Notifier>,

    /// Last classified state
    watcher: TransitionWatcher,

    /// Time between iterations
    poll_interval: Duration,

    /// Upper bound on one notifier call
    notify_timeout: Duration,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl MonitorEngine {
    /// Create a new engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        status: Arc<StatusService>,
        notifier: Arc<dyn Notifier>,
        config: &MonitorConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let engine = Self {
            status,
            notifier,
            watcher: TransitionWatcher::new(),
            poll_interval: config.poll_interval(),
            notify_timeout: config.timeouts.notify(),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Last classified state, `None` before the first successful iteration
    pub fn current_state(&self) -> Option<OverallState> {
        self.watcher.current()
    }

    /// Run the poll loop until Ctrl-C
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run with a programmatic shutdown signal instead of Ctrl-C
    ///
    /// The daemon uses this to stop the loop together with the HTTP server.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!("Starting poll loop (interval={:?})", self.poll_interval);
        self.emit_event(EngineEvent::Started {
            interval: self.poll_interval,
        });

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for Ctrl-C: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
        };
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                Some(_) = ticks.next() => {
                    if let Err(e) = self.tick().await {
                        error!("Poll iteration failed: {}", e);
                        self.emit_event(EngineEvent::IterationFailed {
                            error: e.to_string(),
                        });
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run one probe → classify → watch → notify cycle
    ///
    /// Probing runs on its own task so that a panic inside a probe surfaces
    /// here as an error instead of unwinding the loop.
    pub async fn tick(&mut self) -> Result<Option<Transition>> {
        let status = Arc::clone(&self.status);
        let observation = tokio::spawn(async move { status.observe().await })
            .await
            .map_err(|e| Error::Other(format!("probe task aborted: {}", e)))?;

        let state = observation.overall();
        debug!(
            "Observed {} (vpn_up={}, hotspot_up={})",
            state,
            observation.vpn_up(),
            observation.hotspot_up()
        );
        self.emit_event(EngineEvent::StateObserved { state });

        let Some(transition) = self.watcher.observe(&observation) else {
            return Ok(None);
        };

        info!("State changed: {} -> {}", transition.from, transition.to);
        self.emit_event(EngineEvent::TransitionDetected {
            from: transition.from,
            to: transition.to,
        });

        self.deliver(&transition).await;
        Ok(Some(transition))
    }

    /// Delivery runs on its own task; a panicking notifier counts as a
    /// failed notification and the loop keeps going.
    async fn deliver(&self, transition: &Transition) {
        let notification = transition.to_notification();
        let event = notification.event.clone();
        let notifier = Arc::clone(&self.notifier);
        let notify_timeout = self.notify_timeout;

        let delivery = tokio::spawn(async move {
            tokio::time::timeout(notify_timeout, notifier.notify(&notification)).await
        })
        .await;

        let failure = match delivery {
            Ok(Ok(Ok(()))) => None,
            Ok(Ok(Err(e))) => Some(e.to_string()),
            Ok(Err(_)) => Some(format!(
                "{} notifier timed out after {:?}",
                self.notifier.notifier_name(),
                self.notify_timeout
            )),
            Err(e) => Some(format!("notifier task aborted: {}", e)),
        };

        match failure {
            None => {
                debug!("Sent {} via {}", event, self.notifier.notifier_name());
                self.emit_event(EngineEvent::NotificationSent { event });
            }
            Some(error) => {
                error!("Failed to send {} notification: {}", event, error);
                self.emit_event(EngineEvent::NotificationFailed { event, error });
            }
        }
    }

    fn emit_event(&self, event: EngineEvent) {
        // Nobody listening is fine; a full channel means the consumer lags
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Event channel full, dropping event");
        }
    }
}
