// # hotspotd - VPN/hotspot monitor daemon
//
// Thin wiring layer: all state logic lives in hotspot-core.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the system probe, script runner and notifier
// 4. Running the poll loop and the HTTP API side by side
//
// ## Configuration
//
// - `HOTSPOT_INTERFACE`, `LAN_INTERFACE`, `WG_INTERFACE`: interface names
// - `HOTSPOT_SERVICE_NAME`, `HOSTAPD_SERVICE`: systemd units
// - `STATE_POLL_INTERVAL`: poll interval in seconds (default 10)
// - `WAN_CACHE_TTL`: external-IP cache TTL in seconds (default 60)
// - `WEBUI_HOST`, `WEBUI_PORT`: HTTP bind address (default 0.0.0.0:8090)
// - `HOTSPOT_START_SCRIPT`, `HOTSPOT_STOP_SCRIPT`: control scripts
// - `DISCORD_WEBHOOK_URL`: transition alerts, disabled when unset
// - `HOTSPOT_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Usage
//
// ```bash
// hotspotd                                 # run the daemon
// hotspotd notify vpn-hotspot-on "manual"  # send one notification and exit
// hotspotd notify                         # sends [generic] Event generic
// ```

mod config;
mod server;

use anyhow::Result;
use config::Config;
use hotspot_core::traits::Notification;
use hotspot_core::{
    ControlService, EngineEvent, MonitorEngine, Notifier, NullNotifier, StatusService,
};
use hotspot_probe_linux::{ScriptRunner, SystemProbe};
use server::AppState;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (including a failed listener bind)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Event name used by `hotspotd notify` when none is given
const DEFAULT_EVENT: &str = "generic";

/// Command selected from argv
enum Command {
    Serve,
    Notify { event: String, message: String },
}

impl Command {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        match args.next().as_deref() {
            None => Ok(Command::Serve),
            Some("notify") => {
                let event = args.next().unwrap_or_else(|| DEFAULT_EVENT.to_string());
                let rest: Vec<String> = args.collect();
                let message = if rest.is_empty() {
                    format!("Event {}", event)
                } else {
                    rest.join(" ")
                };
                Ok(Command::Notify { event, message })
            }
            Some(other) => anyhow::bail!(
                "unknown command '{}'. usage: hotspotd [notify <event> [message...]]",
                other
            ),
        }
    }
}

fn main() -> ExitCode {
    let command = match Command::from_args(std::env::args().skip(1)) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = config.tracing_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let outcome = match command {
            Command::Serve => run_daemon(config).await,
            Command::Notify { event, message } => send_one(&config, event, message).await,
        };
        match outcome {
            Ok(()) => DaemonExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                DaemonExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Select the notifier for the configured webhook
fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>> {
    let Some(url) = config.monitor.webhook_url.as_deref() else {
        info!("DISCORD_WEBHOOK_URL not set, transition alerts disabled");
        return Ok(Arc::new(NullNotifier));
    };

    webhook_notifier(url, config)
}

#[cfg(feature = "discord")]
fn webhook_notifier(url: &str, config: &Config) -> Result<Arc<dyn Notifier>> {
    let notifier = hotspot_notify_discord::DiscordNotifier::with_timeout(
        url,
        config.monitor.timeouts.notify(),
    )?;
    info!("Discord notifications enabled");
    Ok(Arc::new(notifier))
}

#[cfg(not(feature = "discord"))]
fn webhook_notifier(_url: &str, _config: &Config) -> Result<Arc<dyn Notifier>> {
    tracing::warn!("DISCORD_WEBHOOK_URL is set but hotspotd was built without the discord feature");
    Ok(Arc::new(NullNotifier))
}

/// `hotspotd notify <event> [message...]`
async fn send_one(config: &Config, event: String, message: String) -> Result<()> {
    let notifier = build_notifier(config)?;
    if notifier.notifier_name() == NullNotifier.notifier_name() {
        anyhow::bail!(
            "notify command needs a webhook notifier: set DISCORD_WEBHOOK_URL \
            and build with the discord feature"
        );
    }

    let notification = Notification::new(event, message);
    notifier.notify(&notification).await?;
    info!(
        "Sent {} via {}",
        notification.event,
        notifier.notifier_name()
    );
    Ok(())
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let monitor = &config.monitor;
    info!("Starting hotspotd");
    info!(
        "Watching vpn={} hotspot={} lan={} (service={}, hostapd={})",
        monitor.interfaces.wg,
        monitor.interfaces.hotspot,
        monitor.interfaces.lan,
        monitor.services.hotspot_service,
        monitor.services.hostapd,
    );

    let probe = Arc::new(SystemProbe::from_timeouts(&monitor.timeouts));
    let status = Arc::new(StatusService::from_config(probe, monitor));
    let runner = Arc::new(ScriptRunner::new(&monitor.scripts, monitor.timeouts.script()));
    let control = Arc::new(ControlService::new(runner, status.clone()));
    let notifier = build_notifier(&config)?;

    let (mut engine, events) = MonitorEngine::new(status.clone(), notifier, monitor)?;
    tokio::spawn(log_events(events));

    let bind_addr = monitor.webui.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", bind_addr, e))?;
    info!("HTTP API listening on http://{}", bind_addr);

    let (engine_stop_tx, engine_stop_rx) = oneshot::channel();
    let engine_task = tokio::spawn(async move { engine.run_with_shutdown(Some(engine_stop_rx)).await });

    let app = server::router(AppState { status, control });
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match wait_for_shutdown().await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Shutdown signal error: {}", e),
            }
        })
        .await;

    info!("Shutting down poll loop");
    let _ = engine_stop_tx.send(());
    match engine_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Poll loop error: {}", e),
        Err(e) => error!("Poll loop task failed: {}", e),
    }

    served.map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;
    info!("hotspotd stopped");
    Ok(())
}

/// Drain engine events into the log
async fn log_events(mut events: mpsc::Receiver<EngineEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::TransitionDetected { from, to } => {
                info!("State transition: {} -> {}", from, to)
            }
            other => debug!("Engine event: {:?}", other),
        }
    }
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Fallback for non-Unix platforms
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
