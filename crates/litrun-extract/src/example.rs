// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Split a zone into (snippet, expected output) pairs.

use std::fmt;

use crate::error::ExtractError;
use crate::zone::Zone;

/// Marker that introduces one line of expected output.
pub const EXPECTED_MARKER: &str = "// -> ";

/// One runnable example extracted from a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Example {
    /// Prefix shared by every line of this example, stripped from the lines below.
    pub indent: String,
    /// Code lines, in order.
    pub snippet: Vec<String>,
    /// Expected output lines with the marker removed. May be empty.
    pub expected: Vec<String>,
    /// 1-indexed document line of the first snippet line.
    pub line: usize,
}

impl Example {
    /// The snippet as one newline-joined source string.
    pub fn source(&self) -> String {
        self.snippet.join("\n")
    }

    /// The expected output as one newline-joined string.
    pub fn expected_text(&self) -> String {
        self.expected.join("\n")
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.snippet.first().map(String::as_str).unwrap_or("");
        let more = if self.snippet.len() > 1 { " ..." } else { "" };
        write!(f, "example at line {} (`{}`{})", self.line, first.trim(), more)
    }
}

/// Splits zone text into examples using indentation-anchored markers.
#[derive(Debug, Clone)]
pub struct ExampleExtractor {
    sigil: String,
    marker: String,
}

impl Default for ExampleExtractor {
    fn default() -> Self {
        Self {
            sigil: "///".to_string(),
            marker: EXPECTED_MARKER.to_string(),
        }
    }
}

impl ExampleExtractor {
    /// Extract every example in `zone`, in document order.
    pub fn extract(&self, zone: &Zone) -> Result<Vec<Example>, ExtractError> {
        let lines: Vec<&str> = zone.text.lines().collect();
        let mut examples = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            // Leftover blank and sigil-only lines must not take part in
            // indent detection.
            if self.is_filler(lines[i]) {
                i += 1;
                continue;
            }

            let indent = self.indent_of(lines[i]);
            if let Some(text) = self.expectation(lines[i], indent) {
                return Err(ExtractError::OrphanExpectation {
                    line: zone.line + i,
                    text,
                });
            }

            let start = i;
            let mut snippet = Vec::new();
            while i < lines.len() {
                let line = lines[i];
                if self.is_filler(line) || self.expectation(line, indent).is_some() {
                    break;
                }
                match line.strip_prefix(indent) {
                    Some(rest) => snippet.push(rest.to_string()),
                    None => break,
                }
                i += 1;
            }

            let mut expected = Vec::new();
            while let Some(text) = lines.get(i).and_then(|line| self.expectation(line, indent)) {
                expected.push(text);
                i += 1;
            }

            examples.push(Example {
                indent: indent.to_string(),
                snippet,
                expected,
                line: zone.line + start,
            });
        }

        Ok(examples)
    }

    fn is_filler(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed == self.sigil
    }

    /// Leading whitespace, plus the sigil and the whitespace after it when
    /// the line is a doc-comment line.
    fn indent_of<'a>(&self, line: &'a str) -> &'a str {
        let leading = line.len() - line.trim_start_matches([' ', '\t']).len();
        let rest = &line[leading..];
        let commented = rest
            .strip_prefix(self.sigil.as_str())
            .filter(|after| after.starts_with(' '));
        match commented {
            Some(after) => {
                let gap = after.len() - after.trim_start_matches([' ', '\t']).len();
                &line[..line.len() - after.len() + gap]
            }
            None => &line[..leading],
        }
    }

    /// Expected output carried by `line`, if it is a marker line under `indent`.
    fn expectation(&self, line: &str, indent: &str) -> Option<String> {
        let rest = line.strip_prefix(indent)?;
        if let Some(text) = rest.strip_prefix(self.marker.as_str()) {
            return Some(text.to_string());
        }
        // A marker with nothing after it, once editors strip the trailing space.
        (rest == self.marker.trim_end()).then(String::new)
    }
}
