use thiserror::Error;

use crate::scenario::template::RenderError;
use crate::scenario::ScenarioError;

/// Hard failures while executing a scenario. Content mismatches are
/// not errors - they travel as `FailedInteraction` values so the rest
/// of the run keeps going.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("'{0}' isn't a valid protocol kind (expected 'rest' or 'stream')")]
    UnknownProtocol(String),

    #[error("Invalid endpoint url '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    /// Connection failure, non-success status, or a response body that
    /// is not JSON. Aborts the scenario's remaining turns.
    #[error("scenario '{scenario}': {detail}")]
    Transport { scenario: String, detail: String },

    /// A rendered user turn that cannot be sent, e.g. a non-object
    /// body that cannot carry the sender tag.
    #[error("scenario '{scenario}': template '{template}' rendered an unsendable user turn: {detail}")]
    MalformedUserTurn {
        scenario: String,
        template: String,
        detail: String,
    },

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
