use std::collections::BTreeMap;
use std::process;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sysinfo::System;

/// Fixed signature token prefixing every sender id, so one grep over
/// the backend's logs isolates harness traffic.
pub const SENDER_ID_SIGNATURE: &str = "ITEST";

/// Ambient variable under which the sender id is exposed to templates.
pub const SENDER_ID_VARIABLE: &str = "SENDER_ID";

/// Correlation token uniquely identifying one scenario execution:
/// signature, host identity plus process id, run timestamp, and the
/// scenario name, joined with underscores.
pub fn sender_id(run_timestamp: DateTime<Utc>, scenario_name: &str) -> String {
    let host = System::host_name().unwrap_or_else(|| "localhost".to_string());
    format!(
        "{}_{}{}_{}_{}",
        SENDER_ID_SIGNATURE,
        host,
        process::id(),
        run_timestamp.timestamp_millis(),
        scenario_name
    )
}

/// The default substitution layer for template rendering, assembled
/// once per scenario run: the process environment plus the run's
/// sender id. Turn-local variables override these.
#[derive(Debug, Clone, Default)]
pub struct AmbientContext {
    variables: BTreeMap<String, Value>,
}

impl AmbientContext {
    pub fn for_scenario(sender_id: &str) -> Self {
        let mut variables: BTreeMap<String, Value> = std::env::vars()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        variables.insert(
            SENDER_ID_VARIABLE.to_string(),
            Value::String(sender_id.to_string()),
        );
        Self { variables }
    }

    /// Adds or replaces one ambient variable, e.g. a per-turn step id.
    pub fn with_variable(mut self, key: &str, value: Value) -> Self {
        self.variables.insert(key.to_string(), value);
        self
    }

    pub fn variables(&self) -> &BTreeMap<String, Value> {
        &self.variables
    }
}
