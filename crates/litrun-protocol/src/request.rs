// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Turn an example's snippet into something the engine can run.
//!
//! The controller only ships the raw snippet. The worker then splits it into
//! definitions (include directives) and one compound statement block. The
//! block is never chunked: the engine resolves names differently when
//! statements arrive one by one.

use litrun_extract::Example;

use crate::message::ExecutionRequest;

/// A request split into what to define and what to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Definitions to hand to the engine's `define`, in order.
    pub definitions: Vec<String>,
    /// Statement blocks for `execute`. Holds at most one joined block.
    pub statements: Vec<String>,
}

/// Builds requests from examples and normalizes them for execution.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    /// Lines starting with this prefix are definitions.
    pub directive_prefix: String,
    /// Always defined, so a minimal standard environment exists.
    pub baseline_definition: String,
    /// Significant digits for floating-point output.
    pub precision: usize,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            directive_prefix: "#include".to_string(),
            baseline_definition: "#include <iostream>".to_string(),
            precision: 6,
        }
    }
}

impl RequestBuilder {
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// One request per example, never batched with another example.
    pub fn request(&self, example: &Example) -> ExecutionRequest {
        ExecutionRequest {
            code: example.source(),
        }
    }

    /// The statement that fixes numeric output formatting for every run.
    pub fn baseline_statement(&self) -> String {
        format!("std::cout << std::setprecision({});", self.precision)
    }

    /// Split a request into definitions and a single compound block.
    ///
    /// If the last statement does not end in `;` it is taken to be a bare
    /// expression and rewritten to print its value. Only the last line is
    /// ever rewritten, and the test is purely on the trailing character.
    pub fn prepare(&self, request: &ExecutionRequest) -> PreparedRequest {
        let lines: Vec<&str> = request.code.split('\n').collect();

        let mut definitions: Vec<String> = lines
            .iter()
            .filter(|line| line.starts_with(self.directive_prefix.as_str()))
            .map(|line| line.to_string())
            .collect();
        definitions.push(self.baseline_definition.clone());

        let mut statements = vec![self.baseline_statement()];
        statements.extend(
            lines
                .iter()
                .filter(|line| !line.is_empty() && !line.starts_with(self.directive_prefix.as_str()))
                .map(|line| line.to_string()),
        );

        if let Some(last) = statements.last_mut() {
            if !last.ends_with(';') {
                *last = format!("std::cout << std::boolalpha << ({});", last);
            }
        }

        PreparedRequest {
            definitions,
            statements: vec![statements.join("\n")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepare(code: &str) -> PreparedRequest {
        RequestBuilder::default().prepare(&ExecutionRequest { code: code.to_string() })
    }

    #[test]
    fn bare_expression_is_printed() {
        let prepared = prepare("1 + 1");
        assert_eq!(prepared.definitions, vec!["#include <iostream>"]);
        assert_eq!(
            prepared.statements,
            vec!["std::cout << std::setprecision(6);\nstd::cout << std::boolalpha << (1 + 1);"]
        );
    }

    #[test]
    fn single_compound_block() {
        let prepared = prepare("int x = 1;\nx + 1");
        assert_eq!(prepared.statements.len(), 1);
        let block = &prepared.statements[0];
        assert!(block.contains("int x = 1;"));
        assert!(block.contains("std::cout << std::boolalpha << (x + 1);"));
    }

    #[test]
    fn includes_become_definitions() {
        let prepared = prepare("#include <cmath>\nstd::sqrt(4.0)\n#include <string>");
        assert_eq!(
            prepared.definitions,
            vec!["#include <cmath>", "#include <string>", "#include <iostream>"]
        );
        assert!(!prepared.statements[0].contains("#include"));
    }

    #[test]
    fn only_the_last_line_is_rewritten() {
        let prepared = prepare("a\nb");
        assert_eq!(
            prepared.statements[0],
            "std::cout << std::setprecision(6);\na\nstd::cout << std::boolalpha << (b);"
        );
    }

    #[test]
    fn terminated_last_line_is_left_alone() {
        let prepared = prepare("int y = 2;");
        assert_eq!(prepared.statements[0], "std::cout << std::setprecision(6);\nint y = 2;");
    }

    #[test]
    fn definitions_only_snippet() {
        let prepared = prepare("#include <vector>");
        assert_eq!(prepared.statements, vec!["std::cout << std::setprecision(6);"]);
    }

    #[test]
    fn heuristic_keys_on_trailing_semicolon_only() {
        // A `;` inside a literal does not count, only the final character does.
        let prepared = prepare("f(\"x;\")");
        assert!(prepared.statements[0].ends_with("std::cout << std::boolalpha << (f(\"x;\"));"));

        // A line cut off inside a literal that ends in `;` counts as terminated.
        let prepared = prepare("std::string s = \"a;");
        assert!(prepared.statements[0].ends_with("\nstd::string s = \"a;"));

        // Trailing whitespace after `;` defeats the check and wraps the line.
        let prepared = prepare("int z = 3; ");
        assert!(prepared.statements[0].ends_with("std::cout << std::boolalpha << (int z = 3; );"));
    }

    #[test]
    fn precision_is_configurable() {
        let prepared = RequestBuilder::with_precision(10)
            .prepare(&ExecutionRequest { code: "x;".to_string() });
        assert!(prepared.statements[0].starts_with("std::cout << std::setprecision(10);"));
    }

    #[test]
    fn request_joins_snippet_lines() {
        let example = Example {
            indent: "    ".to_string(),
            snippet: vec!["int x = 1;".to_string(), "x + 1".to_string()],
            expected: vec!["2".to_string()],
            line: 1,
        };
        let request = RequestBuilder::default().request(&example);
        assert_eq!(request.code, "int x = 1;\nx + 1");
    }
}
