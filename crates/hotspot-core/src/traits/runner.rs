// # Runner Trait
//
// Defines the interface for the external scripts that start and stop the
// VPN/hotspot stack. This system never manages that lifecycle itself; it
// only forwards the request.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A control action accepted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    /// Accepts exactly `start` or `stop`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            _ => Err(crate::Error::invalid_input(
                "action must be 'start' or 'stop'",
            )),
        }
    }
}

/// Captured result of a finished script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutput {
    /// Process exit code; `-1` if terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Output for a script that never produced an exit status
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for control script runners
///
/// # Errors
///
/// - [`crate::Error::ScriptMissing`] if the action's script does not exist
/// - [`crate::Error::ScriptFailed`] if it could not be spawned
/// - [`crate::Error::Timeout`] if it overran its time bound
///
/// A script that runs and exits non-zero is **not** an error; its exit code
/// is reported in [`RunOutput`].
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(&self, action: Action) -> Result<RunOutput, crate::Error>;
}
