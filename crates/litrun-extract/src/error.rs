// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Extraction error types.

use thiserror::Error;

/// A grammar mismatch inside one document or zone.
///
/// These never abort a whole run: the offending zone is skipped and the
/// remaining zones are still extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("line {line}: `{marker}` fence is never closed by a matching `{marker}`")]
    UnterminatedFence { line: usize, marker: String },

    #[error("line {line}: expected output `{text}` does not follow any snippet")]
    OrphanExpectation { line: usize, text: String },
}

impl ExtractError {
    /// 1-indexed document line the error points at.
    pub fn line(&self) -> usize {
        match self {
            ExtractError::UnterminatedFence { line, .. } => *line,
            ExtractError::OrphanExpectation { line, .. } => *line,
        }
    }
}
