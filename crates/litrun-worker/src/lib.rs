// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The litrun worker: a single-threaded executor that lives in its own
//! process and talks to the controller only through the channel.
//!
//! Engine state (everything an example defines) persists across requests,
//! so examples in one document build on each other. Output buffers do not:
//! every response carries only what its own request printed.

pub mod calc;
pub mod engine;
pub mod guard;
pub mod translate;
pub mod worker;

pub use calc::CalcEngine;
pub use engine::{Captured, Engine, EngineError, FaultMode, RaisedFault};
pub use guard::FaultGuard;
pub use translate::translate;
pub use worker::{Worker, WorkerState};
