//! Control-script runner

use crate::command;
use async_trait::async_trait;
use hotspot_core::config::ScriptConfig;
use hotspot_core::traits::{Action, RunOutput, Runner};
use hotspot_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Executes the configured start/stop scripts
///
/// The scripts own the VPN/hotspot lifecycle; this runner only launches
/// them and reports what they printed.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    start: PathBuf,
    stop: PathBuf,
    timeout: Duration,
}

impl ScriptRunner {
    pub fn new(scripts: &ScriptConfig, timeout: Duration) -> Self {
        Self {
            start: scripts.start.clone(),
            stop: scripts.stop.clone(),
            timeout,
        }
    }

    /// Script path for `action`
    pub fn script(&self, action: Action) -> &Path {
        match action {
            Action::Start => &self.start,
            Action::Stop => &self.stop,
        }
    }
}

#[async_trait]
impl Runner for ScriptRunner {
    async fn run(&self, action: Action) -> Result<RunOutput> {
        let path = self.script(action);

        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Err(Error::script_missing(path)),
            Err(e) => {
                return Err(Error::script_failed(format!(
                    "cannot access {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        info!("Executing {}", path.display());

        let out = command::run(path, std::iter::empty::<&str>(), self.timeout)
            .await
            .map_err(|e| match e {
                Error::ProbeUnavailable(msg) => Error::script_failed(msg),
                other => other,
            })?;

        Ok(RunOutput {
            exit_code: out.code,
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }
}
