// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Translate raised engine faults into canonical [`Fault`]s.

use std::sync::OnceLock;

use litrun_protocol::Fault;
use regex::Regex;

use crate::engine::RaisedFault;

/// Native exception type that maps to [`litrun_protocol::FaultKind::ValueFault`].
pub const INVALID_ARGUMENT: &str = "std::invalid_argument";

fn terminate_signature() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)^terminate called after throwing an instance of '([^']*)'\n  what\(\):  (.*)\n Generating stack trace\.\.\.",
        )
        .expect("terminate signature is a valid regex")
    })
}

/// Find an abrupt-termination report in captured stderr.
///
/// Returns the native exception type and its message.
pub fn scrape_terminate(stderr: &str) -> Option<(String, String)> {
    let caps = terminate_signature().captures(stderr)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

fn classify(type_name: &str, what: String) -> Fault {
    if type_name == INVALID_ARGUMENT {
        Fault::value(what)
    } else {
        Fault::generic(what)
    }
}

/// Turn a raised fault into a [`Fault`].
///
/// Structured native faults are classified directly. An unstructured abort
/// falls back to scraping `stderr`. When the termination report is found
/// there, it is consumed: `stderr` is cleared, since its content now lives
/// in the fault.
pub fn translate(raised: RaisedFault, stderr: &mut String) -> Fault {
    match raised {
        RaisedFault::Native { type_name, what } => classify(&type_name, what),
        RaisedFault::Aborted(message) => match scrape_terminate(stderr) {
            Some((type_name, what)) => {
                stderr.clear();
                classify(&type_name, what)
            }
            None => Fault::generic(message),
        },
        RaisedFault::Signal(message) | RaisedFault::Other(message) => Fault::generic(message),
    }
}
