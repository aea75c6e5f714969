//! Merging default and custom testcases.

use std::collections::HashSet;

use super::TestCase;
use super::segment::segment;

/// Drop cases whose [`TestCase::structural_key`] was already seen.
///
/// The first occurrence wins and order is preserved.
pub fn dedup_cases<I: IntoIterator<Item = TestCase>>(cases: I) -> Vec<TestCase> {
    let mut seen = HashSet::new();
    cases
        .into_iter()
        .filter(|case| seen.insert(case.structural_key()))
        .collect()
}

/// Segment both blobs and return the unique cases, default ones first.
///
/// # Examples
///
/// ```
/// use leetdown::testcase::combine_unique;
///
/// let cases = combine_unique(&["nums"], "[1]\n[2]", "[2]\n[3]");
/// let values: Vec<_> = cases.iter().map(|c| c.get("nums").unwrap()).collect();
/// assert_eq!(values, ["[1]", "[2]", "[3]"]);
/// ```
pub fn combine_unique<S: AsRef<str>>(
    names: &[S],
    default_blob: &str,
    custom_blob: &str,
) -> Vec<TestCase> {
    let defaults = segment(default_blob, names).cases;
    let custom = segment(custom_blob, names).cases;
    let total = defaults.len() + custom.len();

    let unique = dedup_cases(defaults.into_iter().chain(custom));
    if unique.len() < total {
        log::debug!("dropped {} duplicate testcase(s)", total - unique.len());
    }
    unique
}
