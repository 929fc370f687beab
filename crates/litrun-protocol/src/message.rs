// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Wire message types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller → worker: one example's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
}

/// Worker → controller: what running one request produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub stdout: String,
    pub stderr: String,
    pub fault: Option<Fault>,
}

/// Canonical classification of a fault raised by the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// An invalid-argument condition.
    ValueFault,
    /// Anything else.
    GenericFault,
}

/// A translated engine fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn value(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::ValueFault,
            message: message.into(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::GenericFault,
            message: message.into(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
