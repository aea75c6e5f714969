//! Splitting a raw testcase blob into cases.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::TestCase;

static COUNT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").unwrap());

/// Cases recovered from one blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResult {
    pub cases: Vec<TestCase>,
    /// The first line was taken as an explicit case count.
    pub used_leading_count_heuristic: bool,
}

/// Name of the `index`-th variable, synthesizing `var{n}` past the list.
pub fn variable_name<S: AsRef<str>>(names: &[S], index: usize) -> String {
    match names.get(index) {
        Some(name) => name.as_ref().to_string(),
        None => format!("var{}", index + 1),
    }
}

/// Split `blob` into cases of `names.len()` lines each (at least one).
///
/// Trailing blank lines are ignored. When the first line is an integer `T`
/// and the remaining lines form exactly `T` cases, it is read as a count
/// line. Otherwise the lines are cut into whole cases if they divide evenly,
/// and failing that a single case is built from the first lines, padded with
/// empty values.
///
/// # Examples
///
/// ```
/// use leetdown::testcase::segment;
///
/// let result = segment("2\n[1,2]\n3\n[4]\n5", &["nums", "k"]);
/// assert!(result.used_leading_count_heuristic);
/// assert_eq!(result.cases.len(), 2);
/// assert_eq!(result.cases[1].get("nums"), Some("[4]"));
/// ```
pub fn segment<S: AsRef<str>>(blob: &str, names: &[S]) -> SegmentResult {
    let normalized = blob.replace("\r\n", "\n");
    let mut lines: Vec<&str> = normalized.split('\n').collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let width = names.len().max(1);
    let total = lines.len();
    if total == 0 {
        return SegmentResult::default();
    }

    if let Some(count) = leading_count(lines[0]) {
        let rem = total - 1;
        if rem % width == 0 && (rem / width) as u64 == count {
            log::debug!("testcase blob: count line {count}, {width} value(s) per case");
            return SegmentResult {
                cases: lines[1..].chunks(width).map(|w| build_case(w, names, width)).collect(),
                used_leading_count_heuristic: true,
            };
        }
    }

    let cases = if total % width == 0 {
        log::debug!("testcase blob: {} case(s) by even division", total / width);
        lines.chunks(width).map(|w| build_case(w, names, width)).collect()
    } else {
        log::debug!("testcase blob: {total} line(s) do not divide by {width}, single case");
        vec![build_case(&lines[..width.min(total)], names, width)]
    };

    SegmentResult {
        cases,
        used_leading_count_heuristic: false,
    }
}

/// A non-negative integer count line. Negative counts can never match.
fn leading_count(line: &str) -> Option<u64> {
    let line = line.trim();
    if !COUNT_LINE.is_match(line) {
        return None;
    }
    line.parse::<u64>().ok()
}

fn build_case<S: AsRef<str>>(window: &[&str], names: &[S], width: usize) -> TestCase {
    (0..width)
        .map(|i| (variable_name(names, i), window.get(i).copied().unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_NAMES: &[&str] = &[];

    fn values(result: &SegmentResult, name: &str) -> Vec<String> {
        result
            .cases
            .iter()
            .map(|c| c.get(name).unwrap_or("<missing>").to_string())
            .collect()
    }

    #[test]
    fn test_empty_and_blank_blobs() {
        assert_eq!(segment("", &["a"]), SegmentResult::default());
        assert_eq!(segment("  \n\t\n \r\n", &["a"]), SegmentResult::default());
    }

    #[test]
    fn test_count_prefix() {
        let result = segment("2\n1\n2", &["x"]);
        assert!(result.used_leading_count_heuristic);
        assert_eq!(values(&result, "x"), ["1", "2"]);
    }

    #[test]
    fn test_count_prefix_preferred_over_even_division() {
        // Even division would give four cases here.
        let result = segment("3\na\nb\nc", &["s"]);
        assert!(result.used_leading_count_heuristic);
        assert_eq!(values(&result, "s"), ["a", "b", "c"]);
    }

    #[test]
    fn test_even_division_when_count_mismatches() {
        let result = segment("7\n1\n2\n3", &["a", "b"]);
        assert!(!result.used_leading_count_heuristic);
        assert_eq!(values(&result, "a"), ["7", "2"]);
        assert_eq!(values(&result, "b"), ["1", "3"]);
    }

    #[test]
    fn test_lone_number_is_a_value() {
        let result = segment("5", &["n"]);
        assert!(!result.used_leading_count_heuristic);
        assert_eq!(values(&result, "n"), ["5"]);
    }

    #[test]
    fn test_lone_zero_is_an_empty_count() {
        let result = segment("0", &["n"]);
        assert!(result.used_leading_count_heuristic);
        assert!(result.cases.is_empty());
    }

    #[test]
    fn test_single_case_fallback_pads() {
        let result = segment("[1,2]\n3\n4", &["a", "b", "c", "d"]);
        assert_eq!(result.cases.len(), 1);
        let case = &result.cases[0];
        assert_eq!(case.get("a"), Some("[1,2]"));
        assert_eq!(case.get("c"), Some("4"));
        assert_eq!(case.get("d"), Some(""));
    }

    #[test]
    fn test_single_case_fallback_truncates() {
        let result = segment("x\ny\nz", &["a", "b"]);
        assert!(!result.used_leading_count_heuristic);
        assert_eq!(result.cases.len(), 1);
        assert_eq!(result.cases[0].len(), 2);
        assert_eq!(result.cases[0].get("a"), Some("x"));
        assert_eq!(result.cases[0].get("b"), Some("y"));
    }

    #[test]
    fn test_numeric_first_line_matching_count() {
        let result = segment("1\n2\n3", &["a", "b"]);
        assert!(result.used_leading_count_heuristic);
        assert_eq!(result.cases.len(), 1);
        assert_eq!(result.cases[0].get("a"), Some("2"));
        assert_eq!(result.cases[0].get("b"), Some("3"));
    }

    #[test]
    fn test_synthesized_names() {
        let result = segment("x", NO_NAMES);
        assert_eq!(result.cases[0].get("var1"), Some("x"));
    }

    #[test]
    fn test_crlf_and_trailing_blank_lines() {
        let result = segment("1\r\n2\r\n\r\n  \n", &["a", "b"]);
        assert_eq!(result.cases.len(), 1);
        assert_eq!(result.cases[0].get("b"), Some("2"));
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let result = segment("  hello \n", &["s"]);
        assert_eq!(result.cases[0].get("s"), Some("  hello "));
    }

    #[test]
    fn test_inner_blank_lines_are_values() {
        let result = segment("a\n\nb", &["s"]);
        assert_eq!(values(&result, "s"), ["a", "", "b"]);
    }

    #[test]
    fn test_negative_count_never_matches() {
        let result = segment("-1\n2", &["a"]);
        assert!(!result.used_leading_count_heuristic);
        assert_eq!(values(&result, "a"), ["-1", "2"]);
    }
}
