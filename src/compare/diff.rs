use indexmap::IndexMap;
use serde_json::Value;

use crate::compare::path::JsonPath;

/// Outcome of one structural comparison.
///
/// `missing_entries` holds leaves present in the expected document but
/// absent or different in the actual one; `extra_entries` holds leaves
/// present in the actual document but absent or different in the
/// expected one. A changed scalar appears in both maps under the same
/// path, so callers can pair them up as an "expected -> got" display.
/// Insertion order is document order, which keeps reports stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDiff {
    pub missing_entries: IndexMap<JsonPath, Value>,
    pub extra_entries: IndexMap<JsonPath, Value>,
}

impl JsonDiff {
    pub fn identical(&self) -> bool {
        self.missing_entries.is_empty() && self.extra_entries.is_empty()
    }

    pub(crate) fn record_missing(&mut self, path: JsonPath, value: Value) {
        self.missing_entries.insert(path, value);
    }

    pub(crate) fn record_extra(&mut self, path: JsonPath, value: Value) {
        self.extra_entries.insert(path, value);
    }
}
