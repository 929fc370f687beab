// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Literate testing: extract runnable examples from documentation.
//!
//! Examples live in two kinds of zones:
//!
//! - fenced Markdown blocks tagged `c`, `c++` or `cpp`;
//! - indented doc-comment blocks in headers, opened by a bare `///` line.
//!
//! Inside a zone, snippet lines share an indent and the expected output
//! follows on lines carrying the same indent plus `// -> `:
//!
//! ```text
//! int x = 20;
//! x + 22
//! // -> 42
//! ```

pub mod document;
pub mod error;
pub mod example;
pub mod zone;

pub use document::{extract_document, DocumentKind, Extraction};
pub use error::ExtractError;
pub use example::{Example, ExampleExtractor, EXPECTED_MARKER};
pub use zone::{DocCommentDetector, FencedDetector, ScanReport, Span, Zone, ZoneDetector};
