// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Line-delimited JSON framing: one message per `\n`-terminated line.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Errors while moving a message across the channel.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("channel i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("channel closed by peer")]
    Closed,
}

/// Write one message and flush it, so the peer sees it as a unit.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), ProtocolError> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Read one message. `Ok(None)` means the peer closed the channel cleanly.
pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>, ProtocolError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line.trim_end())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ExecutionRequest;

    #[test]
    fn one_message_per_line() {
        let mut buf = Vec::new();
        write_message(&mut buf, &ExecutionRequest { code: "a\nb".to_string() }).unwrap();
        write_message(&mut buf, &ExecutionRequest { code: "c".to_string() }).unwrap();
        assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 2);

        let mut reader = buf.as_slice();
        let first: Option<ExecutionRequest> = read_message(&mut reader).unwrap();
        assert_eq!(first.unwrap().code, "a\nb");
        let second: Option<ExecutionRequest> = read_message(&mut reader).unwrap();
        assert_eq!(second.unwrap().code, "c");
        let eof: Option<ExecutionRequest> = read_message(&mut reader).unwrap();
        assert!(eof.is_none());
    }

    #[test]
    fn garbage_is_malformed() {
        let mut reader: &[u8] = b"not json\n";
        let result: Result<Option<ExecutionRequest>, _> = read_message(&mut reader);
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }
}
