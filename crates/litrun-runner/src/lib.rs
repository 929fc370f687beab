// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The controller side of litrun.
//!
//! A [`RunnerFacade`] owns one worker process for a session, sends it one
//! example at a time and folds each response into a verdict string. A
//! worker that dies mid-session is reported as [`RunnerError::WorkerCrash`]
//! and is never restarted behind the caller's back.

pub mod config;
pub mod error;
pub mod facade;
pub mod transport;
pub mod verdict;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use facade::RunnerFacade;
pub use transport::{Transport, WorkerHandle};
pub use verdict::compose_verdict;
