//! Prober backed by the system `ping` utility.
//!
//! Raw ICMP sockets need privileges that a status-bar helper rarely has, while
//! the setuid/capability-enabled `ping` binary is available nearly everywhere.
//! Each probe spawns `ping -c 1` and reads its exit status.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use super::{ProbeOutcome, Prober};
use crate::error::ProbeError;

/// Extra time granted to the child beyond the probe timeout before it is killed.
const DEFAULT_GRACE: Duration = Duration::from_secs(1);

/// A [`Prober`] that runs the system `ping` command once per probe.
///
/// Exit status 0 means a reply arrived. Any other status whose output reports
/// an unreachable destination or network is [`ProbeOutcome::Unreachable`].
/// Otherwise exit status 1 means no reply ([`ProbeOutcome::Timeout`]), and
/// anything else (unknown host, bad arguments, missing permissions) is a
/// [`ProbeOutcome::Error`].
///
/// The child is spawned with `kill_on_drop`, so a probe abandoned by a
/// stopping monitor does not outlive it.
#[derive(Debug, Clone)]
pub struct PingProber {
    program: OsString,
    grace: Duration,
}

impl PingProber {
    /// Create a prober that runs `ping` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ping")
    }

    /// Create a prober that runs a specific ping binary.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            grace: DEFAULT_GRACE,
        }
    }

    /// Set how long the child may overrun the probe timeout before it is killed.
    pub fn grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Arguments for a single numeric echo request.
    fn args(target: &str, timeout: Duration, payload_size: u32) -> Vec<String> {
        // -W takes whole seconds on most ping implementations.
        let wait_secs = timeout.as_secs_f64().ceil().max(1.0) as u64;
        vec![
            "-n".to_string(),
            "-c".to_string(),
            "1".to_string(),
            "-s".to_string(),
            payload_size.to_string(),
            "-W".to_string(),
            wait_secs.to_string(),
            target.to_string(),
        ]
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, target: &str, timeout: Duration, payload_size: u32) -> ProbeOutcome {
        let child = Command::new(&self.program)
            .args(Self::args(target, timeout, payload_size))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => return ProbeOutcome::Error(ProbeError::Spawn(e.to_string())),
        };

        match tokio::time::timeout(timeout + self.grace, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let outcome = classify_exit(output.status.code(), &stdout, &stderr);
                trace!(host = target, ?outcome, "ping finished");
                outcome
            }
            Ok(Err(e)) => ProbeOutcome::Error(ProbeError::Spawn(e.to_string())),
            Err(_) => {
                trace!(host = target, "ping overran its timeout, killing it");
                ProbeOutcome::Timeout
            }
        }
    }
}

/// Map a finished ping process to an outcome.
fn classify_exit(code: Option<i32>, stdout: &str, stderr: &str) -> ProbeOutcome {
    match code {
        Some(0) => ProbeOutcome::Received,
        // Without a route, iputils exits 2 with "connect: Network is unreachable".
        Some(_) if reports_unreachable(stdout) || reports_unreachable(stderr) => {
            ProbeOutcome::Unreachable
        }
        Some(1) => ProbeOutcome::Timeout,
        Some(code) => {
            let reason = stderr
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("ping exited with status {code}"));
            ProbeOutcome::Error(ProbeError::Failed(reason))
        }
        None => ProbeOutcome::Error(ProbeError::Failed(
            "ping was terminated by a signal".to_string(),
        )),
    }
}

fn reports_unreachable(output: &str) -> bool {
    output.to_ascii_lowercase().contains("unreachable")
}
