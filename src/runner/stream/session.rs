use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::compare::JsonComparator;
use crate::runner::failed::FailedInteraction;
use crate::runner::stream::plan::MessagePlan;

pub const SESSION_ID_KEY: &str = "session_id";

/// Single-owner state machine for one streaming scenario run.
///
/// Owns the message plan and the first recorded failure; the driver
/// feeds it incoming events and sends out whatever it hands back. No
/// I/O happens here, which keeps every transition unit-testable.
pub struct StreamSession {
    plan: MessagePlan,
    session_id: String,
    comparator: Arc<JsonComparator>,
    current_user_input: Value,
    failure: Option<FailedInteraction>,
}

impl StreamSession {
    pub fn new(plan: MessagePlan, session_id: String, comparator: Arc<JsonComparator>) -> Self {
        Self {
            plan,
            session_id,
            comparator,
            current_user_input: json!({}),
            failure: None,
        }
    }

    /// Pops every user entry at the front of the plan and returns them
    /// tagged with the session id, ready to send. Consecutive scripted
    /// user turns are flushed before any wait.
    pub fn take_user_sends(&mut self) -> Vec<Value> {
        let mut sends = Vec::new();
        while self.plan.front_is_user() {
            if let Some(entry) = self.plan.pop() {
                let tagged = self.tag_session(entry.body);
                self.current_user_input = tagged.clone();
                sends.push(tagged);
            }
        }
        sends
    }

    /// Consumes the awaited bot entry for one incoming event, compares
    /// it, and returns the user turns now due. The first mismatch is
    /// recorded and kept; later events still drain the plan but never
    /// overwrite it. An event arriving with nothing awaited is compared
    /// against an empty expectation, so unsolicited bot traffic
    /// surfaces as extra entries.
    pub fn on_event(&mut self, payload: &Value) -> Vec<Value> {
        let mut sends = self.take_user_sends();

        let expected = match self.plan.pop() {
            Some(entry) => entry.body,
            None => json!({}),
        };
        let diff = self.comparator.compare(&expected, payload);
        if !diff.identical() && self.failure.is_none() {
            debug!(target: "stream_runner", session_id = %self.session_id, "bot event mismatch");
            self.failure = Some(FailedInteraction {
                user_input: self.current_user_input.clone(),
                expected_output: expected,
                actual_output: payload.clone(),
                output_diff: diff,
            });
        }

        sends.extend(self.take_user_sends());
        sends
    }

    /// Failure for an expired wait: every bot message still on the plan
    /// is treated as one batch that never arrived. A drained plan (or a
    /// batch that diffs clean against nothing) is not a failure.
    pub fn timeout_failure(&mut self) -> Option<FailedInteraction> {
        let remaining = self.plan.remaining_bot_messages();
        if remaining.is_empty() {
            return None;
        }
        let batch = Value::Array(remaining);
        let diff = self.comparator.compare(&json!({}), &batch);
        if diff.identical() {
            return None;
        }
        Some(FailedInteraction {
            user_input: self.current_user_input.clone(),
            expected_output: json!({}),
            actual_output: batch,
            output_diff: diff,
        })
    }

    pub fn is_drained(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn failure(&self) -> Option<&FailedInteraction> {
        self.failure.as_ref()
    }

    pub fn take_failure(&mut self) -> Option<FailedInteraction> {
        self.failure.take()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn tag_session(&self, body: Value) -> Value {
        match body {
            Value::Object(fields) => {
                let mut tagged = Map::new();
                tagged.insert(
                    SESSION_ID_KEY.to_string(),
                    Value::String(self.session_id.clone()),
                );
                tagged.extend(fields);
                Value::Object(tagged)
            }
            // Nothing to tag on a non-object body; send it as rendered.
            other => other,
        }
    }
}
