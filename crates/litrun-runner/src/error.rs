// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Controller errors.

use std::io;
use std::path::PathBuf;

use litrun_protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// The worker process could not be started.
    #[error("failed to spawn worker `{}`: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `run` was called with no live worker: never initialized, shut down,
    /// or lost to an earlier crash.
    #[error("worker is not running")]
    NotRunning,

    /// The channel failed while an example was in flight. Fatal to the
    /// session.
    #[error("worker crashed while running {example}: {source}")]
    WorkerCrash {
        example: String,
        #[source]
        source: ProtocolError,
    },
}

impl RunnerError {
    pub fn is_crash(&self) -> bool {
        matches!(self, RunnerError::WorkerCrash { .. })
    }
}
