//! Testcase blobs: segmentation into cases, deduplication and presentation.
//!
//! A problem page carries its sample input as a flat blob of lines, one
//! value per line, cases back to back. [`segment`] turns a blob plus the
//! parameter names into [`TestCase`]s, [`combine_unique`] merges the default
//! and custom blobs, and [`render_table`]/[`cases_to_json`] present them.

mod dedup;
mod render;
mod segment;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

pub use dedup::{combine_unique, dedup_cases};
pub use render::{cases_to_json, render_table};
pub use segment::{SegmentResult, segment, variable_name};

/// One testcase: variable name → raw value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    values: Vec<(String, String)>,
}

impl TestCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing an earlier value for the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Canonical identity: pairs sorted by name, each JSON-encoded.
    ///
    /// Two cases with the same values compare equal under this key
    /// regardless of insertion order.
    pub fn structural_key(&self) -> String {
        let mut pairs: Vec<&(String, String)> = self.values.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
            .iter()
            .map(|(name, value)| {
                format!("{}:{}", Value::from(name.as_str()), Value::from(value.as_str()))
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TestCase {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut case = TestCase::new();
        for (name, value) in iter {
            case.insert(name, value);
        }
        case
    }
}

impl Serialize for TestCase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut case = TestCase::new();
        case.insert("b", "1");
        case.insert("a", "2");
        case.insert("b", "3");
        assert_eq!(case.names().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(case.get("b"), Some("3"));
        assert_eq!(case.get("c"), None);
    }

    #[test]
    fn test_structural_key_ignores_order() {
        let left: TestCase = [("a", "1"), ("b", "[2]")].into_iter().collect();
        let right: TestCase = [("b", "[2]"), ("a", "1")].into_iter().collect();
        assert_ne!(left, right);
        assert_eq!(left.structural_key(), right.structural_key());
        assert_eq!(left.structural_key(), r#""a":"1","b":"[2]""#);
    }

    #[test]
    fn test_structural_key_escapes_values() {
        let tricky: TestCase = [("a", "1\",\"b\":\"2")].into_iter().collect();
        let plain: TestCase = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_ne!(tricky.structural_key(), plain.structural_key());
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let case: TestCase = [("target", "9"), ("nums", "[2,7]")].into_iter().collect();
        let json = serde_json::to_string(&case).unwrap();
        assert_eq!(json, r#"{"target":"9","nums":"[2,7]"}"#);
    }
}
