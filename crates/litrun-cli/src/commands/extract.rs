// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `litrun extract`: show what the extractor sees in one document.

use std::fs;
use std::path::Path;

use litrun_extract::{extract_document, DocumentKind, Example, Zone};
use serde::Serialize;

use super::fail;
use crate::cli::Format;
use crate::output;
use crate::report::ProblemReport;

#[derive(Serialize)]
struct ExtractReport<'a> {
    path: String,
    delimiters: String,
    zones: &'a [Zone],
    examples: &'a [Example],
    errors: Vec<ProblemReport>,
}

pub fn cmd_extract(path: &Path, format: Format) {
    let display = path.display().to_string();
    let Some(kind) = DocumentKind::from_path(path) else {
        fail(format!(
            "{}: not a Markdown or header document",
            output::file_path(&display)
        ));
    };
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => fail(format!("reading {}: {}", output::file_path(&display), e)),
    };

    let zones = kind.detector().detect(&content);
    let extraction = extract_document(&content, kind);
    let report = ExtractReport {
        path: display,
        delimiters: kind.detector().describe(),
        zones: &zones,
        examples: &extraction.examples,
        errors: extraction
            .errors
            .iter()
            .map(|e| ProblemReport {
                line: Some(e.line()),
                message: e.to_string(),
            })
            .collect(),
    };

    match format {
        Format::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        },
        Format::Human => print_report(&report),
    }
}

fn print_report(report: &ExtractReport<'_>) {
    println!("{}", output::file_path(&report.path));
    println!(
        "{} zones, {} examples ({})",
        report.zones.len(),
        report.examples.len(),
        report.delimiters.replace('\n', " ")
    );

    for example in report.examples {
        println!();
        println!("{}", output::section_header(&format!("line {}", example.line)));
        for line in &example.snippet {
            println!("    {}", line);
        }
        for line in &example.expected {
            println!("    -> {}", line);
        }
    }

    for error in &report.errors {
        println!();
        println!("{}: {}", output::warning_label(), error.message);
    }
}
