// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The controller/worker protocol.
//!
//! Exactly two messages cross the channel: an [`ExecutionRequest`] from the
//! controller and an [`ExecutionResponse`] back from the worker, one JSON
//! object per line. There is no handshake and no versioning.

pub mod framing;
pub mod message;
pub mod request;

pub use framing::{read_message, write_message, ProtocolError};
pub use message::{ExecutionRequest, ExecutionResponse, Fault, FaultKind};
pub use request::{PreparedRequest, RequestBuilder};
