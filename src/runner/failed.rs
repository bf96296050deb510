use serde_json::Value;

use crate::compare::JsonDiff;

/// The first interaction whose bot output did not match the script.
/// Created at most once per scenario execution; carrying the rendered
/// messages alongside the diff lets the report show the whole exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedInteraction {
    pub user_input: Value,
    pub expected_output: Value,
    pub actual_output: Value,
    pub output_diff: JsonDiff,
}
