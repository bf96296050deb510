use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::compare::diff::JsonDiff;
use crate::compare::path::JsonPath;

/// Compares an actual bot response against the expected document, path
/// by path.
///
/// A `null` leaf in the expected document is a wildcard for any
/// terminal value at that position: a scalar, `null`, or a missing key
/// all match. It does not match a subtree: when the actual value at a
/// null-expected path is an object or array, its leaves are still
/// reported as extra.
pub struct JsonComparator {
    ignored_paths: HashSet<String>,
}

impl JsonComparator {
    /// `ignored_paths` is a comma-separated list of dotted paths from
    /// the comparison root. Matching is exact, not a glob.
    pub fn new(ignored_paths: &str) -> Self {
        Self {
            ignored_paths: ignored_paths
                .split(',')
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn compare(&self, expected: &Value, actual: &Value) -> JsonDiff {
        let mut diff = JsonDiff::default();
        self.compare_at(expected, actual, &JsonPath::root(), &mut diff);
        trace!(
            missing = diff.missing_entries.len(),
            extra = diff.extra_entries.len(),
            "comparison finished"
        );
        diff
    }

    fn is_ignored(&self, path: &JsonPath) -> bool {
        !path.is_root() && self.ignored_paths.contains(&path.dotted())
    }

    fn compare_at(&self, expected: &Value, actual: &Value, path: &JsonPath, diff: &mut JsonDiff) {
        if self.is_ignored(path) {
            return;
        }
        match (expected, actual) {
            (Value::Object(expected_map), Value::Object(actual_map)) => {
                for (key, expected_value) in expected_map {
                    let child = path.child(key);
                    match actual_map.get(key) {
                        Some(actual_value) => {
                            self.compare_at(expected_value, actual_value, &child, diff)
                        }
                        None => self.record_missing_subtree(expected_value, &child, diff),
                    }
                }
                for (key, actual_value) in actual_map {
                    if !expected_map.contains_key(key) {
                        self.record_extra_subtree(actual_value, &path.child(key), diff);
                    }
                }
            }
            (Value::Array(expected_items), Value::Array(actual_items)) => {
                for (index, expected_value) in expected_items.iter().enumerate() {
                    let child = path.element(index);
                    match actual_items.get(index) {
                        Some(actual_value) => {
                            self.compare_at(expected_value, actual_value, &child, diff)
                        }
                        None => self.record_missing_subtree(expected_value, &child, diff),
                    }
                }
                for (index, actual_value) in actual_items.iter().enumerate().skip(expected_items.len())
                {
                    self.record_extra_subtree(actual_value, &path.element(index), diff);
                }
            }
            (Value::Null, actual_value) => {
                // Wildcard only at terminal positions.
                if actual_value.is_object() || actual_value.is_array() {
                    self.record_extra_subtree(actual_value, path, diff);
                }
            }
            (expected_value, actual_value) if expected_value == actual_value => {}
            (expected_value, actual_value) => {
                // Unequal scalars or a shape mismatch: each side lands in
                // its own map, containers expanded to their leaves.
                self.record_missing_subtree(expected_value, path, diff);
                self.record_extra_subtree(actual_value, path, diff);
            }
        }
    }

    fn record_missing_subtree(&self, value: &Value, path: &JsonPath, diff: &mut JsonDiff) {
        if self.is_ignored(path) {
            return;
        }
        match value {
            // Expected-null leaves match anything, including absence.
            Value::Null => {}
            Value::Object(map) => {
                for (key, child) in map {
                    self.record_missing_subtree(child, &path.child(key), diff);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.record_missing_subtree(child, &path.element(index), diff);
                }
            }
            leaf => diff.record_missing(path.clone(), leaf.clone()),
        }
    }

    fn record_extra_subtree(&self, value: &Value, path: &JsonPath, diff: &mut JsonDiff) {
        if self.is_ignored(path) {
            return;
        }
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.record_extra_subtree(child, &path.child(key), diff);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.record_extra_subtree(child, &path.element(index), diff);
                }
            }
            leaf => diff.record_extra(path.clone(), leaf.clone()),
        }
    }
}
