// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! How to launch the worker process.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the worker binary installed next to `litrun`.
pub const WORKER_BINARY: &str = "litrun-worker";

pub const WORKER_ENV: &str = "LITRUN_WORKER";
pub const GRACE_ENV: &str = "LITRUN_GRACE_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Worker executable.
    pub worker: PathBuf,
    /// Extra arguments passed to the worker.
    pub args: Vec<String>,
    /// How long `shutdown` waits for the worker to exit before killing it.
    pub grace_period: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            worker: sibling_worker(),
            args: Vec::new(),
            grace_period: Duration::from_secs(1),
        }
    }
}

impl RunnerConfig {
    pub fn new(worker: impl Into<PathBuf>) -> Self {
        Self {
            worker: worker.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Defaults, overridden by `LITRUN_WORKER` and `LITRUN_GRACE_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(worker) = lookup(WORKER_ENV).filter(|w| !w.is_empty()) {
            config.worker = PathBuf::from(worker);
        }
        if let Some(raw) = lookup(GRACE_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.grace_period = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", GRACE_ENV),
            }
        }
        config
    }
}

/// The worker binary in the same directory as the running executable,
/// falling back to a `PATH` lookup.
fn sibling_worker() -> PathBuf {
    let name = format!("{}{}", WORKER_BINARY, env::consts::EXE_SUFFIX);
    match env::current_exe() {
        Ok(exe) => exe.with_file_name(name),
        Err(_) => PathBuf::from(name),
    }
}
