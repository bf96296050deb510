pub mod ambient;
pub mod error;
pub mod failed;
pub mod resolve;
pub mod rest;
pub mod stream;

use async_trait::async_trait;

pub use ambient::AmbientContext;
pub use error::RunnerError;
pub use failed::FailedInteraction;
pub use resolve::resolve_interactions;
pub use rest::{RestProfile, RestRunner};
pub use stream::StreamRunner;

use crate::scenario::Scenario;

/// The two supported transports. Parsed from configuration exactly
/// once at startup; an unknown kind fails before any scenario runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerKind {
    Rest,
    Stream,
}

impl RunnerKind {
    pub fn from_config(kind: &str) -> Result<Self, RunnerError> {
        match kind {
            "rest" => Ok(Self::Rest),
            "stream" => Ok(Self::Stream),
            other => Err(RunnerError::UnknownProtocol(other.to_string())),
        }
    }
}

/// Drives one scenario against the backend under test.
///
/// A content mismatch is the expected "test failed" outcome and comes
/// back as `Ok(Some(_))`; `Err` is reserved for hard stops (transport
/// failures, broken definitions) that abort the scenario outright.
#[async_trait]
pub trait ScenarioRunner: Send + Sync {
    async fn run(&self, scenario: &Scenario) -> Result<Option<FailedInteraction>, RunnerError>;
}
