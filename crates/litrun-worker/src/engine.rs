// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The execution-engine seam.
//!
//! An engine is the language backend that actually runs example code. The
//! worker only needs two operations from it, `define` and `execute`, plus
//! a switch for how signal-level faults surface.

use thiserror::Error;

/// Text an engine wrote while running one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stdout: text.into(),
            stderr: String::new(),
        }
    }

    /// Append another chunk, separating non-empty chunks with a newline.
    pub fn record(&mut self, chunk: Captured) {
        append(&mut self.stdout, chunk.stdout);
        append(&mut self.stderr, chunk.stderr);
    }
}

fn append(buffer: &mut String, chunk: String) {
    if !buffer.is_empty() && !chunk.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(&chunk);
}

/// How the engine reacts to hardware or signal-level faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultMode {
    /// The fault takes the process down.
    #[default]
    Fatal,
    /// The fault is raised as an ordinary [`RaisedFault::Signal`].
    Catchable,
}

/// A fault as the engine reports it, before translation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaisedFault {
    /// A native exception object, with its type and message.
    #[error("{type_name}: {what}")]
    Native { type_name: String, what: String },

    /// A signal converted into a fault while the guard was engaged.
    #[error("{0}")]
    Signal(String),

    /// The engine gave up without a structured fault. Details may only be
    /// found in what it wrote to stderr.
    #[error("{0}")]
    Aborted(String),

    /// Anything else: compile errors, unknown names, panics.
    #[error("{0}")]
    Other(String),
}

/// A failed engine call: the fault plus whatever was written before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{fault}")]
pub struct EngineError {
    pub captured: Captured,
    pub fault: RaisedFault,
}

impl EngineError {
    pub fn new(fault: RaisedFault) -> Self {
        Self {
            captured: Captured::default(),
            fault,
        }
    }

    pub fn with_captured(fault: RaisedFault, captured: Captured) -> Self {
        Self { captured, fault }
    }
}

impl From<RaisedFault> for EngineError {
    fn from(fault: RaisedFault) -> Self {
        Self::new(fault)
    }
}

/// A language backend the worker can drive.
pub trait Engine {
    /// Define a top-level fragment, such as an include directive.
    fn define(&mut self, source: &str) -> Result<Captured, EngineError>;

    /// Execute one compound statement block.
    fn execute(&mut self, block: &str) -> Result<Captured, EngineError>;

    /// Switch the signal handling mode, returning the previous one.
    fn set_fault_mode(&mut self, mode: FaultMode) -> FaultMode;
}
