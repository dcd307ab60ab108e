//! Bounded subprocess execution

use hotspot_core::{Error, Result};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::process::Command;

/// Captured output of a finished command
#[derive(Debug, Clone)]
pub(crate) struct CommandOutput {
    /// Exit code; `-1` if killed by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run `program` with `args`, killing it if it overruns `timeout`
///
/// # Errors
///
/// - [`Error::ProbeUnavailable`] if the program is missing or cannot spawn
/// - [`Error::Timeout`] if it does not finish in time
pub(crate) async fn run<I, S>(program: impl AsRef<OsStr>, args: I, timeout: Duration) -> Result<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let label = program.to_string_lossy().into_owned();

    let child = Command::new(program)
        .args(args)
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, child).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::probe_unavailable(format!("{} not found", label)));
        }
        Ok(Err(e)) => {
            return Err(Error::probe_unavailable(format!("{}: {}", label, e)));
        }
        Err(_) => {
            return Err(Error::timeout(format!("{} after {:?}", label, timeout)));
        }
    };

    Ok(CommandOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
