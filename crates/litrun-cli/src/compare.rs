// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The comparator: does a verdict match an example's expected lines?

/// Strip trailing whitespace per line and drop trailing empty lines.
pub fn normalize(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// An example with no expected lines only matches an empty verdict.
pub fn matches(verdict: &str, expected: &[String]) -> bool {
    normalize(verdict) == normalize(&expected.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_match() {
        assert!(matches("2", &lines(&["2"])));
        assert!(!matches("3", &lines(&["2"])));
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        assert!(matches("a  \nb\n\n", &lines(&["a", "b"])));
        assert!(matches("a\nb", &lines(&["a", "b", ""])));
    }

    #[test]
    fn inner_blank_lines_count() {
        assert!(matches("warn\n\nok", &lines(&["warn", "", "ok"])));
        assert!(!matches("warn\nok", &lines(&["warn", "", "ok"])));
    }

    #[test]
    fn no_expectation_means_silence() {
        assert!(matches("", &[]));
        assert!(!matches("42", &[]));
    }
}
