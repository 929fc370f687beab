// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The verdict text a test compares against an example's expectation.

use litrun_protocol::ExecutionResponse;

/// Join stderr, stdout and the fault message, skipping empty parts, with a
/// blank line between them.
pub fn compose_verdict(response: &ExecutionResponse) -> String {
    let fault = response.fault.as_ref().map(|fault| fault.message.as_str());
    [Some(response.stderr.as_str()), Some(response.stdout.as_str()), fault]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use litrun_protocol::Fault;

    fn response(stderr: &str, stdout: &str, fault: Option<Fault>) -> ExecutionResponse {
        ExecutionResponse {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            fault,
        }
    }

    #[test]
    fn stdout_only() {
        assert_eq!(compose_verdict(&response("", "ok", None)), "ok");
    }

    #[test]
    fn stderr_comes_first() {
        assert_eq!(compose_verdict(&response("warn", "ok", None)), "warn\n\nok");
    }

    #[test]
    fn fault_message_last() {
        let fault = Some(Fault::value("negative precision"));
        assert_eq!(
            compose_verdict(&response("warn", "partial", fault.clone())),
            "warn\n\npartial\n\nnegative precision"
        );
        assert_eq!(compose_verdict(&response("", "", fault)), "negative precision");
    }

    #[test]
    fn everything_empty() {
        assert_eq!(compose_verdict(&ExecutionResponse::default()), "");
    }
}
