//! Subprocess invocation with a hard deadline.
//!
//! External tools (the agent runner, the GitHub CLI) are called
//! synchronously. Output is drained on helper threads so a chatty child can't
//! block on a full pipe while we poll for exit. The deadline also bounds the
//! drain: a grandchild holding an inherited pipe open does not extend it.

use crate::error::{Result, TenderError};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `cmd` to completion, killing it if `timeout` elapses first.
///
/// Spawn failures surface as `Io`; an expired deadline as `ExternalTimeout`.
/// A non-zero exit is not an error here; callers inspect `status`.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<CommandOutput> {
    let label = describe(&cmd);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!(command = %label, timeout_secs = timeout.as_secs(), "running external command");
    let deadline = Instant::now() + timeout;
    let mut child = cmd.spawn()?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let expired = || {
        tracing::warn!(command = %label, "external command timed out");
        TenderError::ExternalTimeout {
            command: label.clone(),
            secs: timeout.as_secs(),
        }
    };

    let status = match wait_until(&mut child, deadline)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(expired());
        }
    };

    let stdout = collect(stdout, deadline).ok_or_else(expired)?;
    let stderr = collect(stderr, deadline).ok_or_else(expired)?;
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

fn wait_until(child: &mut Child, deadline: Instant) -> Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<String>> {
    pipe.map(|mut r| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = r.read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
        });
        rx
    })
}

/// Wait for a drained pipe until `deadline`. `None` means the pipe was still
/// open when time ran out; the reader thread is left to finish on its own.
fn collect(rx: Option<Receiver<String>>, deadline: Instant) -> Option<String> {
    let Some(rx) = rx else {
        return Some(String::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(text) => Some(text),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_output_and_status() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 3"]);
        let out = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
        assert_eq!(out.status.code(), Some(3));
    }

    #[test]
    fn kills_on_timeout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 5"]);
        let started = Instant::now();
        let err = run_with_timeout(cmd, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, TenderError::ExternalTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn inherited_pipe_does_not_outlive_deadline() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 6 & echo hi"]);
        let started = Instant::now();
        let err = run_with_timeout(cmd, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TenderError::ExternalTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_binary_is_io_error() {
        let cmd = Command::new("definitely-not-a-real-binary-xyz");
        let err = run_with_timeout(cmd, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TenderError::Io(_)));
    }
}
