// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The request loop.

use std::any::Any;
use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use litrun_protocol::{
    read_message, write_message, ExecutionRequest, ExecutionResponse, PreparedRequest,
    ProtocolError, RequestBuilder,
};

use crate::engine::{Captured, Engine, EngineError, RaisedFault};
use crate::guard::FaultGuard;
use crate::translate::translate;

/// Where the worker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for the next request.
    Ready,
    /// Running a request against the engine.
    Executing,
    /// The inbound channel is exhausted; the loop has exited.
    Terminated,
}

/// Serves execution requests against one engine, strictly one at a time.
pub struct Worker<E: Engine> {
    engine: E,
    builder: RequestBuilder,
    state: WorkerState,
}

impl<E: Engine> Worker<E> {
    pub fn new(engine: E) -> Self {
        Self::with_builder(engine, RequestBuilder::default())
    }

    pub fn with_builder(engine: E, builder: RequestBuilder) -> Self {
        Self {
            engine,
            builder,
            state: WorkerState::Ready,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run one request and build its response.
    ///
    /// Buffers start empty for every request. Engine state is untouched
    /// between requests.
    pub fn handle(&mut self, request: &ExecutionRequest) -> ExecutionResponse {
        self.state = WorkerState::Executing;

        let prepared = self.builder.prepare(request);
        let mut output = Captured::default();
        let raised = self.run(&prepared, &mut output);
        let fault = raised.map(|raised| translate(raised, &mut output.stderr));

        tracing::debug!(
            stdout = output.stdout.len(),
            stderr = output.stderr.len(),
            fault = ?fault,
            "request handled"
        );
        self.state = WorkerState::Ready;

        ExecutionResponse {
            stdout: output.stdout,
            stderr: output.stderr,
            fault,
        }
    }

    fn run(&mut self, prepared: &PreparedRequest, output: &mut Captured) -> Option<RaisedFault> {
        for definition in &prepared.definitions {
            let engine = &mut self.engine;
            if let Err(fault) = settle(catch(|| engine.define(definition)), output) {
                return Some(fault);
            }
        }

        for block in &prepared.statements {
            let mut guard = FaultGuard::engage(&mut self.engine);
            let result = catch(|| guard.execute(block));
            drop(guard);
            if let Err(fault) = settle(result, output) {
                return Some(fault);
            }
        }

        None
    }

    /// Serve requests until the channel closes.
    ///
    /// EOF is a clean shutdown. A malformed request or a broken outbound
    /// channel ends the loop with an error.
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: &mut R, writer: &mut W) -> Result<(), ProtocolError> {
        tracing::info!("worker ready");
        loop {
            let Some(request) = read_message::<_, ExecutionRequest>(reader)? else {
                self.state = WorkerState::Terminated;
                tracing::info!("channel closed, worker exiting");
                return Ok(());
            };
            let response = self.handle(&request);
            write_message(writer, &response)?;
        }
    }
}

/// Run an engine call, turning a panic into a raised fault.
fn catch<F>(call: F) -> Result<Captured, EngineError>
where
    F: FnOnce() -> Result<Captured, EngineError>,
{
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(RaisedFault::Other(panic_message(payload.as_ref())).into()))
}

/// Append a call's output to the buffers, passing its fault on.
fn settle(result: Result<Captured, EngineError>, output: &mut Captured) -> Result<(), RaisedFault> {
    match result {
        Ok(captured) => {
            output.record(captured);
            Ok(())
        }
        Err(EngineError { captured, fault }) => {
            output.record(captured);
            Err(fault)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("engine panicked: {}", s)
    } else {
        "engine panicked".to_string()
    }
}
