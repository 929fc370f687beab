// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Results of a `litrun test` run.

use serde::Serialize;

/// What happened to one example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { actual: String },
    /// The worker died while running this example.
    Crashed { message: String },
    /// An earlier crash ended the session first.
    NotRun,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. } | Outcome::Crashed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleReport {
    pub line: usize,
    pub source: String,
    pub expected: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// A zone that could not be parsed, or a document that could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemReport {
    pub line: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: String,
    pub examples: Vec<ExampleReport>,
    pub problems: Vec<ProblemReport>,
}

impl DocumentReport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            examples: Vec::new(),
            problems: Vec::new(),
        }
    }

    pub fn failures(&self) -> usize {
        self.problems.len() + self.examples.iter().filter(|e| e.outcome.is_failure()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub files: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_run: usize,
}

impl TestSummary {
    pub fn add(&mut self, document: &DocumentReport) {
        self.files += 1;
        self.failed += document.problems.len();
        for example in &document.examples {
            self.total += 1;
            match example.outcome {
                Outcome::Passed => self.passed += 1,
                Outcome::NotRun => self.not_run += 1,
                Outcome::Failed { .. } | Outcome::Crashed { .. } => self.failed += 1,
            }
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestReport {
    pub documents: Vec<DocumentReport>,
    pub summary: TestSummary,
}

impl TestReport {
    pub fn push(&mut self, document: DocumentReport) {
        self.summary.add(&document);
        self.documents.push(document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(outcome: Outcome) -> ExampleReport {
        ExampleReport {
            line: 1,
            source: "1 + 1".to_string(),
            expected: "2".to_string(),
            outcome,
        }
    }

    #[test]
    fn summary_counts() {
        let mut document = DocumentReport::new("a.md");
        document.examples = vec![
            example(Outcome::Passed),
            example(Outcome::Failed { actual: "3".to_string() }),
            example(Outcome::Crashed { message: "gone".to_string() }),
            example(Outcome::NotRun),
        ];
        document.problems.push(ProblemReport { line: Some(9), message: "unterminated".to_string() });
        assert_eq!(document.failures(), 3);

        let mut report = TestReport::default();
        report.push(document);
        assert_eq!(
            report.summary,
            TestSummary { files: 1, total: 4, passed: 1, failed: 3, not_run: 1 }
        );
        assert!(!report.summary.success());
    }

    #[test]
    fn outcome_json_shape() {
        let json = serde_json::to_value(example(Outcome::Failed { actual: "3".to_string() })).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["actual"], "3");
        assert_eq!(json["line"], 1);
        let json = serde_json::to_value(example(Outcome::NotRun)).unwrap();
        assert_eq!(json["status"], "not_run");
    }
}
