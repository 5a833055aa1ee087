//! Thin wrappers around external commands the engine shells out to.

use tokio::process::Command;
use tracing::debug;

/// Run a command and capture stdout. Returns None when the binary cannot
/// be spawned or exits non-zero; callers treat that as "no data".
pub(crate) async fn run_command(cmd: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(cmd).args(args).output().await {
        Ok(out) => out,
        Err(e) => {
            debug!(cmd, error = %e, "command spawn failed");
            return None;
        }
    };
    if !output.status.success() {
        debug!(cmd, status = ?output.status.code(), "command exited non-zero");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Exit-status-only variant for probes where output does not matter.
pub(crate) async fn run_status(cmd: &str, args: &[&str]) -> bool {
    match Command::new(cmd).args(args).output().await {
        Ok(out) => out.status.success(),
        Err(_) => false,
    }
}
