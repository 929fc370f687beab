// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.
//! Colors are automatically disabled when output is piped.

use colored::{ColoredString, Colorize};

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    // colored crate handles NO_COLOR automatically,
    // but we add explicit FORCE_COLOR support
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

// === Error Output ===

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn warning_label() -> ColoredString {
    "warning".yellow().bold()
}

// === Status Output ===

pub fn status_pass() -> ColoredString {
    "✓".green()
}

pub fn status_fail() -> ColoredString {
    "✗".red()
}

pub fn status_skip() -> ColoredString {
    "-".yellow()
}

pub fn line_ref(n: usize) -> ColoredString {
    format!("line {}", n).dimmed()
}

pub fn code(snippet: &str) -> ColoredString {
    format!("`{}`", snippet).cyan()
}

pub fn expected_label() -> ColoredString {
    "expected:".green()
}

pub fn actual_label() -> ColoredString {
    "actual:  ".red()
}

// === Decorations ===

pub fn separator(width: usize) -> ColoredString {
    "─".repeat(width).dimmed()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

// === Test Summary ===

pub fn passed_count(n: usize) -> ColoredString {
    format!("{} passed", n).green()
}

pub fn failed_count(n: usize) -> ColoredString {
    if n > 0 {
        format!("{} failed", n).red()
    } else {
        format!("{} failed", n).normal()
    }
}

pub fn not_run_count(n: usize) -> ColoredString {
    if n > 0 {
        format!("{} not run", n).yellow()
    } else {
        format!("{} not run", n).normal()
    }
}
