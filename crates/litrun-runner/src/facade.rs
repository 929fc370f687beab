// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! One session with one worker.

use litrun_extract::Example;
use litrun_protocol::RequestBuilder;

use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::transport::{Transport, WorkerHandle};
use crate::verdict::compose_verdict;

/// Runs examples against a single long-lived worker.
///
/// Everything an example defines stays visible to the examples after it,
/// until the session ends. Requests are strictly sequential: `run` blocks
/// until the worker answers.
pub struct RunnerFacade<T: Transport = WorkerHandle> {
    config: RunnerConfig,
    builder: RequestBuilder,
    transport: Option<T>,
}

impl RunnerFacade<WorkerHandle> {
    /// A facade that will spawn its worker from `config` on `initialize`.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            builder: RequestBuilder::default(),
            transport: None,
        }
    }

    /// Spawn the worker. A no-op while one is already running.
    pub fn initialize(&mut self) -> Result<(), RunnerError> {
        if self.transport.is_none() {
            self.transport = Some(WorkerHandle::spawn(&self.config)?);
        }
        Ok(())
    }
}

impl<T: Transport> RunnerFacade<T> {
    /// A facade over an already-connected transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            config: RunnerConfig::default(),
            builder: RequestBuilder::default(),
            transport: Some(transport),
        }
    }

    pub fn with_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.transport.is_some()
    }

    /// Run one example and return its verdict.
    ///
    /// A fault inside the example is part of the verdict, not an error. An
    /// error here means the channel itself failed; the worker is then shut
    /// down and every later call returns [`RunnerError::NotRunning`].
    pub fn run(&mut self, example: &Example) -> Result<String, RunnerError> {
        let transport = self.transport.as_mut().ok_or(RunnerError::NotRunning)?;
        let request = self.builder.request(example);

        match transport.send(&request).and_then(|()| transport.recv()) {
            Ok(response) => Ok(compose_verdict(&response)),
            Err(source) => {
                tracing::warn!(%example, error = %source, "worker crashed");
                self.shutdown();
                Err(RunnerError::WorkerCrash {
                    example: example.to_string(),
                    source,
                })
            }
        }
    }

    /// Close the channel and stop the worker. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.shutdown();
        }
    }
}

impl<T: Transport> Drop for RunnerFacade<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
