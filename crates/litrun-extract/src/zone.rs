// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Zone detection: locate regions of embedded code inside a document.
//!
//! Two detectors share the [`ZoneDetector`] interface:
//!
//! ````markdown
//! ```cpp
//! 1 + 1
//! // -> 2
//! ```
//! ````
//!
//! and, for headers,
//!
//! ```text
//! ///
//! ///     1 + 1
//! ///     // -> 2
//! ```

use crate::error::ExtractError;

/// Byte range inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A contiguous region of a document that holds embedded code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Zone {
    /// The token that opened the zone: the fence run (e.g. "```") or `///`.
    pub marker: String,
    /// Raw zone content, exactly as it appears in the document.
    pub text: String,
    /// Where `text` sits in the document.
    pub span: Span,
    /// 1-indexed document line of the first content line.
    pub line: usize,
}

/// Zones found in a document, plus any delimiters that could not be matched.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub zones: Vec<Zone>,
    pub errors: Vec<ExtractError>,
}

/// Finds code zones in document text.
pub trait ZoneDetector {
    /// Scan a document, reporting both zones and delimiter problems.
    fn scan(&self, document: &str) -> ScanReport;

    /// Zones only. Malformed delimiters produce no zone.
    fn detect(&self, document: &str) -> Vec<Zone> {
        self.scan(document).zones
    }

    /// Short human-readable form of the delimiters this detector looks for.
    fn describe(&self) -> String;
}

/// One physical line of a document.
struct Line<'a> {
    /// Byte offset of the first character.
    start: usize,
    /// Byte offset just past the line terminator.
    end: usize,
    /// Content without the terminator.
    text: &'a str,
}

fn split_lines(document: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in document.split_inclusive('\n') {
        let end = start + raw.len();
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);
        lines.push(Line { start, end, text });
        start = end;
    }
    lines
}

fn zone_from(document: &str, marker: &str, first: &Line<'_>, end: usize, line: usize) -> Zone {
    let span = Span::new(first.start, end);
    Zone {
        marker: marker.to_string(),
        text: document[span.start..span.end].to_string(),
        span,
        line,
    }
}

// === Fenced blocks ===

/// Detects fenced Markdown code blocks in a fixed set of languages.
///
/// A block opens with a run of three or more backticks (or tildes) followed
/// by a language tag and closes at the next line holding a run of exactly
/// the same length. A block without such a closer yields no zone.
#[derive(Debug, Clone)]
pub struct FencedDetector {
    languages: Vec<String>,
}

impl Default for FencedDetector {
    fn default() -> Self {
        Self::new(["c", "c++", "cpp"])
    }
}

impl FencedDetector {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a fence info string starts with one of our language tags.
    fn accepts(&self, info: &str) -> bool {
        let info = info.trim_start_matches(' ');
        self.languages.iter().any(|lang| {
            info.strip_prefix(lang.as_str())
                .map(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
                .unwrap_or(false)
        })
    }
}

/// Parse an opening fence: `(fence char, run length, info string)`.
fn opening_fence(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start_matches(' ');
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let run = trimmed.bytes().take_while(|&b| b == ch as u8).count();
    if run < 3 {
        return None;
    }
    Some((ch, run, &trimmed[run..]))
}

/// Whether `line` closes a fence of exactly `run` copies of `ch`.
fn closes_fence(line: &str, ch: char, run: usize) -> bool {
    let trimmed = line.trim_start_matches(' ');
    let len = trimmed.bytes().take_while(|&b| b == ch as u8).count();
    len == run && trimmed[len..].trim().is_empty()
}

impl ZoneDetector for FencedDetector {
    fn scan(&self, document: &str) -> ScanReport {
        let lines = split_lines(document);
        let mut report = ScanReport::default();
        let mut i = 0;

        while i < lines.len() {
            let Some((ch, run, info)) = opening_fence(lines[i].text) else {
                i += 1;
                continue;
            };
            if !self.accepts(info) {
                // Fences in other languages may still wrap one of ours.
                i += 1;
                continue;
            }

            let marker: String = std::iter::repeat(ch).take(run).collect();
            let closer = (i + 1..lines.len()).find(|&j| closes_fence(lines[j].text, ch, run));

            match closer {
                Some(j) => {
                    let first = lines.get(i + 1).unwrap_or(&lines[j]);
                    let zone = zone_from(document, &marker, first, lines[j].start, i + 2);
                    tracing::debug!(line = zone.line, marker = %marker, "fenced zone");
                    report.zones.push(zone);
                    i = j + 1;
                }
                None => {
                    report.errors.push(ExtractError::UnterminatedFence {
                        line: i + 1,
                        marker,
                    });
                    i += 1;
                }
            }
        }

        report
    }

    fn describe(&self) -> String {
        self.languages
            .iter()
            .map(|lang| format!("```{} ... ```", lang))
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

// === Doc-comment blocks ===

/// Detects indented code blocks in `///` doc comments.
///
/// A zone opens after a line consisting of nothing but indentation and the
/// sigil. It then takes every following line that repeats that indentation
/// and the sigil, followed by one space and four spaces of code indent.
#[derive(Debug, Clone)]
pub struct DocCommentDetector {
    sigil: String,
}

impl Default for DocCommentDetector {
    fn default() -> Self {
        Self::new("///")
    }
}

impl DocCommentDetector {
    pub fn new(sigil: impl Into<String>) -> Self {
        Self { sigil: sigil.into() }
    }

    /// If `line` is a bare sigil line, return its leading indentation.
    fn opener_indent<'a>(&self, line: &'a str) -> Option<&'a str> {
        let indent_len = line.len() - line.trim_start_matches(' ').len();
        let rest = line[indent_len..].strip_prefix(self.sigil.as_str())?;
        if rest.is_empty() || rest == " " {
            Some(&line[..indent_len])
        } else {
            None
        }
    }

    fn continues_zone(&self, line: &str, indent: &str) -> bool {
        line.strip_prefix(indent)
            .and_then(|rest| rest.strip_prefix(self.sigil.as_str()))
            .and_then(|rest| rest.strip_prefix("     "))
            .is_some()
    }
}

impl ZoneDetector for DocCommentDetector {
    fn scan(&self, document: &str) -> ScanReport {
        let lines = split_lines(document);
        let mut report = ScanReport::default();
        let mut i = 0;

        while i < lines.len() {
            let Some(indent) = self.opener_indent(lines[i].text) else {
                i += 1;
                continue;
            };

            let mut j = i + 1;
            while j < lines.len() && self.continues_zone(lines[j].text, indent) {
                j += 1;
            }

            if j == i + 1 {
                i += 1;
                continue;
            }

            let zone = zone_from(document, &self.sigil, &lines[i + 1], lines[j - 1].end, i + 2);
            tracing::debug!(line = zone.line, "doc-comment zone");
            report.zones.push(zone);
            // The line that ended this zone may open the next one.
            i = j;
        }

        report
    }

    fn describe(&self) -> String {
        format!("{0}\n{0}     ...", self.sigil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(zones: &[Zone]) -> Vec<&str> {
        zones.iter().map(|z| z.text.as_str()).collect()
    }

    #[test]
    fn fenced_cpp_block() {
        let doc = "Intro.\n\n```cpp\nint x = 1;\nx\n// -> 1\n```\n\nOutro.\n";
        let zones = FencedDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["int x = 1;\nx\n// -> 1\n"]);
        assert_eq!(zones[0].marker, "```");
        assert_eq!(zones[0].line, 4);
        assert_eq!(&doc[zones[0].span.start..zones[0].span.end], zones[0].text);
    }

    #[test]
    fn fenced_language_tags() {
        let doc = "```c\na\n```\n```c++\nb\n```\n``` cpp\nc\n```\n```python\nd\n```\n```csharp\ne\n```\n";
        let zones = FencedDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["a\n", "b\n", "c\n"]);
    }

    #[test]
    fn fenced_closer_needs_same_length() {
        let doc = "`````cpp\n```\nstill inside\n```\n`````\n";
        let zones = FencedDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["```\nstill inside\n```\n"]);
    }

    #[test]
    fn fenced_mismatched_lengths_yield_nothing() {
        let doc = "```cpp\n1 + 1\n````\n";
        let report = FencedDetector::default().scan(doc);
        assert!(report.zones.is_empty());
        assert_eq!(
            report.errors,
            vec![ExtractError::UnterminatedFence { line: 1, marker: "```".to_string() }]
        );
    }

    #[test]
    fn fenced_unterminated_does_not_hide_later_blocks() {
        let doc = "````cpp\nlost\n\n```cpp\nfound\n```\n";
        let report = FencedDetector::default().scan(doc);
        assert_eq!(texts(&report.zones), vec!["found\n"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line(), 1);
    }

    #[test]
    fn fenced_is_non_greedy() {
        let doc = "```cpp\nfirst\n```\ntext\n```\n";
        let zones = FencedDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["first\n"]);
    }

    #[test]
    fn fenced_block_nested_in_foreign_fence() {
        let doc = "````markdown\n```cpp\n1 + 1\n// -> 2\n```\n````\n";
        let zones = FencedDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["1 + 1\n// -> 2\n"]);
        assert_eq!(zones[0].line, 3);
    }

    #[test]
    fn fenced_foreign_block_without_ours_is_skipped() {
        let report = FencedDetector::default().scan("```python\nprint(1)\n```\n");
        assert!(report.zones.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn describe_follows_configuration() {
        assert_eq!(
            FencedDetector::default().describe(),
            "```c ... ``` or ```c++ ... ``` or ```cpp ... ```"
        );
        assert_eq!(FencedDetector::new(["rust"]).describe(), "```rust ... ```");
        assert_eq!(DocCommentDetector::new("//!").describe(), "//!\n//!     ...");
    }

    #[test]
    fn fenced_tilde_and_indented_markers() {
        let doc = "  ~~~cpp\n  1\n  ~~~\n";
        let zones = FencedDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["  1\n"]);
    }

    #[test]
    fn fenced_empty_block() {
        let zones = FencedDetector::default().detect("```cpp\n```\n");
        assert_eq!(texts(&zones), vec![""]);
    }

    #[test]
    fn doc_comment_zones() {
        let doc = "\n    ///\n    ///     DEMO\n    ///     DEMO\n    ///\n    ///     DEMO\n    ///\n";
        let zones = DocCommentDetector::default().detect(doc);
        assert_eq!(
            texts(&zones),
            vec!["    ///     DEMO\n    ///     DEMO\n", "    ///     DEMO\n"]
        );
        assert_eq!(zones[0].line, 3);
        assert_eq!(zones[1].line, 6);
        assert_eq!(zones[0].marker, "///");
    }

    #[test]
    fn doc_comment_requires_opener() {
        let doc = "/// Some prose.\n///     not code\n";
        assert!(DocCommentDetector::default().detect(doc).is_empty());
    }

    #[test]
    fn doc_comment_zone_ends_on_pattern_break() {
        let doc = "///\n///     a\n///    b\n///     c\n";
        let zones = DocCommentDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["///     a\n"]);
    }

    #[test]
    fn doc_comment_indent_must_match_opener() {
        let doc = "  ///\n    ///     a\n";
        assert!(DocCommentDetector::default().detect(doc).is_empty());
    }

    #[test]
    fn doc_comment_opener_allows_trailing_space() {
        let doc = "/// \n///     a\n";
        let zones = DocCommentDetector::default().detect(doc);
        assert_eq!(texts(&zones), vec!["///     a\n"]);
    }
}
