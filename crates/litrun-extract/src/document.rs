// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Whole-document extraction: pick a detector, find zones, split examples.

use std::path::Path;

use crate::error::ExtractError;
use crate::example::{Example, ExampleExtractor};
use crate::zone::{DocCommentDetector, FencedDetector, ZoneDetector};

/// Which zone grammar a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Fenced code blocks.
    Markdown,
    /// `///` doc comments.
    Header,
}

impl DocumentKind {
    /// Classify a file by its extension. `None` means "not a document we test".
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "md" | "markdown" => Some(DocumentKind::Markdown),
            "hpp" | "hh" | "hxx" | "h" => Some(DocumentKind::Header),
            _ => None,
        }
    }

    pub fn detector(self) -> Box<dyn ZoneDetector> {
        match self {
            DocumentKind::Markdown => Box::new(FencedDetector::default()),
            DocumentKind::Header => Box::new(DocCommentDetector::default()),
        }
    }
}

/// Examples of one document, plus the zones that could not be parsed.
#[derive(Debug, Default)]
pub struct Extraction {
    pub examples: Vec<Example>,
    pub errors: Vec<ExtractError>,
}

/// Extract every example from `document`.
///
/// Errors are local: a bad zone is reported and skipped, the rest of the
/// document is still extracted.
pub fn extract_document(document: &str, kind: DocumentKind) -> Extraction {
    let report = kind.detector().scan(document);
    let extractor = ExampleExtractor::default();
    let mut extraction = Extraction {
        examples: Vec::new(),
        errors: report.errors,
    };

    for zone in &report.zones {
        match extractor.extract(zone) {
            Ok(examples) => extraction.examples.extend(examples),
            Err(e) => {
                tracing::debug!(line = zone.line, error = %e, "skipping zone");
                extraction.errors.push(e);
            }
        }
    }

    extraction.errors.sort_by_key(ExtractError::line);
    extraction
}
