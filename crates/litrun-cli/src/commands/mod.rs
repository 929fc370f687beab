// SPDX-License-Identifier: (MIT OR Apache-2.0)

pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use litrun_extract::DocumentKind;

use crate::output;

/// Recursively collect every document with a known extension, sorted.
pub fn collect_documents(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if DocumentKind::from_path(path).is_some() {
            files.push(path.to_path_buf());
        }
        return files;
    }

    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_documents(&path));
            } else if DocumentKind::from_path(&path).is_some() {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Print a fatal error and exit with status 1.
pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", output::error_label(), message);
    process::exit(1);
}
