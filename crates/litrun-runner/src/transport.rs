// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The channel to a worker, and the child process behind it.

use std::io::BufReader;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use litrun_protocol::{read_message, write_message, ExecutionRequest, ExecutionResponse, ProtocolError};

use crate::config::RunnerConfig;
use crate::error::RunnerError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A duplex channel to one worker.
pub trait Transport {
    fn send(&mut self, request: &ExecutionRequest) -> Result<(), ProtocolError>;

    /// Block until the next response. A peer that hung up is
    /// [`ProtocolError::Closed`].
    fn recv(&mut self) -> Result<ExecutionResponse, ProtocolError>;

    /// Close the channel and release the worker. Must be idempotent.
    fn shutdown(&mut self);
}

/// A worker running as a child process, spoken to over its stdin/stdout.
///
/// The worker's stderr is inherited, so its logs end up next to ours.
pub struct WorkerHandle {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    grace_period: Duration,
    reaped: bool,
}

impl WorkerHandle {
    pub fn spawn(config: &RunnerConfig) -> Result<Self, RunnerError> {
        let spawn_error = |source| RunnerError::Spawn {
            program: config.worker.clone(),
            source,
        };

        let mut child = Command::new(&config.worker)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_error)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(spawn_error(std::io::Error::other("worker pipes were not captured")));
        };

        tracing::info!(pid = child.id(), worker = %config.worker.display(), "worker started");
        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            grace_period: config.grace_period,
            reaped: false,
        })
    }

    /// Wait for the child to exit on its own, up to the grace period.
    fn wait_grace(&mut self) -> bool {
        let deadline = Instant::now() + self.grace_period;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    tracing::info!(pid = self.child.id(), %status, "worker exited");
                    return true;
                }
                Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
                Ok(None) => return false,
                Err(e) => {
                    tracing::warn!(error = %e, "could not poll worker");
                    return false;
                }
            }
        }
    }
}

impl Transport for WorkerHandle {
    fn send(&mut self, request: &ExecutionRequest) -> Result<(), ProtocolError> {
        let stdin = self.stdin.as_mut().ok_or(ProtocolError::Closed)?;
        write_message(stdin, request)
    }

    fn recv(&mut self) -> Result<ExecutionResponse, ProtocolError> {
        read_message(&mut self.stdout)?.ok_or(ProtocolError::Closed)
    }

    fn shutdown(&mut self) {
        if self.reaped {
            return;
        }
        self.reaped = true;

        // EOF on stdin is the worker's signal to stop.
        drop(self.stdin.take());
        if self.wait_grace() {
            return;
        }

        tracing::warn!(
            pid = self.child.id(),
            grace_ms = self.grace_period.as_millis() as u64,
            "worker did not exit in time, killing it"
        );
        if let Err(e) = self.child.kill() {
            tracing::warn!(error = %e, "failed to kill worker");
        }
        if let Err(e) = self.child.wait() {
            tracing::warn!(error = %e, "failed to reap worker");
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
