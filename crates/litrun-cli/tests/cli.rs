// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for `litrun test` and `litrun extract`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn litrun(args: &[&str], paths: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_litrun"))
        .args(args)
        .args(paths)
        .arg("--worker")
        .arg(env!("CARGO_BIN_EXE_litrun-worker"))
        .env("NO_COLOR", "1")
        .env_remove("LITRUN_LOG")
        .output()
        .expect("failed to run litrun")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!("invalid JSON ({}):\n{}", e, stdout(output));
    })
}

#[test]
fn passing_documents() {
    let markdown = fixture("arith.md");
    let header = fixture("scale.hpp");
    let output = litrun(&["test"], &[&markdown, &header]);
    let text = stdout(&output);
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        text,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("2 files, 10 examples, 10 passed, 0 failed, 0 not run"), "{}", text);
    assert!(text.contains("✓ line 6: `1 + 1`"), "{}", text);
}

#[test]
fn failing_document() {
    let output = litrun(&["test"], &[&fixture("failing.md")]);
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("expected: 7"), "{}", text);
    assert!(text.contains("actual:   6"), "{}", text);
    assert!(text.contains("use of undeclared identifier 'y'"), "{}", text);
    assert!(text.contains("0 passed, 2 failed"), "{}", text);
}

#[test]
fn crash_ends_only_its_own_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.md"),
        "```cpp\n1 + 1\n// -> 2\n```\n\n```cpp\nstd::exit(3);\n```\n\n```cpp\n2 + 2\n// -> 4\n```\n",
    )
    .unwrap();
    fs::write(dir.path().join("b.md"), "```cpp\n3 + 3\n// -> 6\n```\n").unwrap();

    let output = litrun(&["test", "--format", "json"], &[dir.path()]);
    assert_eq!(output.status.code(), Some(1));

    let report = json(&output);
    let statuses = |doc: usize| -> Vec<String> {
        report["documents"][doc]["examples"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["status"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(statuses(0), vec!["passed", "crashed", "not_run"]);
    assert_eq!(statuses(1), vec!["passed"]);
    assert_eq!(report["summary"]["failed"], 1);
    assert_eq!(report["summary"]["not_run"], 1);

    let message = report["documents"][0]["examples"][1]["message"].as_str().unwrap();
    assert!(message.contains("line 7"), "{}", message);
}

#[test]
fn unterminated_fence_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("broken.md");
    fs::write(&doc, "```cpp\n1 + 1\n// -> 2\n").unwrap();

    let output = litrun(&["test", "--format", "json"], &[&doc]);
    assert_eq!(output.status.code(), Some(1));
    let report = json(&output);
    assert_eq!(report["documents"][0]["problems"][0]["line"], 1);
    assert_eq!(report["summary"]["failed"], 1);
}

#[test]
fn fail_fast_stops_after_first_failing_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "```cpp\n1\n// -> 2\n```\n").unwrap();
    fs::write(dir.path().join("b.md"), "```cpp\n1\n// -> 1\n```\n").unwrap();

    let output = litrun(&["test", "--fail-fast", "--format", "json"], &[dir.path()]);
    assert_eq!(output.status.code(), Some(1));
    let report = json(&output);
    assert_eq!(report["documents"].as_array().unwrap().len(), 1);
}

#[test]
fn extract_json() {
    let output = Command::new(env!("CARGO_BIN_EXE_litrun"))
        .args(["extract", "--format", "json"])
        .arg(fixture("scale.hpp"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = json(&output);
    assert_eq!(report["zones"].as_array().unwrap().len(), 4);
    let examples = report["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 4);
    assert_eq!(examples[0]["snippet"][1], "scale * 4");
    assert_eq!(examples[0]["expected"][0], "10");
    assert_eq!(examples[2]["indent"], "    ///     ");
}

#[test]
fn extract_rejects_unknown_extension() {
    let output = Command::new(env!("CARGO_BIN_EXE_litrun"))
        .args(["extract", "notes.txt"])
        .env("NO_COLOR", "1")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: "));
}
