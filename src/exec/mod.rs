pub mod chunk;
pub mod pool;
pub mod report;

pub use chunk::run_chunked;
pub use pool::run_pooled;
pub use report::Reporter;

use std::sync::Arc;

use crate::runner::{FailedInteraction, RunnerError, ScenarioRunner};
use crate::scenario::Scenario;

/// One scenario's terminal failure: either the expected kind (a content
/// mismatch) or a hard stop (transport/protocol error). Successful
/// scenarios produce nothing.
#[derive(Debug)]
pub enum ScenarioFailure {
    Mismatch {
        scenario: String,
        interaction: Box<FailedInteraction>,
    },
    Hard {
        scenario: String,
        error: RunnerError,
    },
}

impl ScenarioFailure {
    pub fn scenario(&self) -> &str {
        match self {
            Self::Mismatch { scenario, .. } | Self::Hard { scenario, .. } => scenario,
        }
    }
}

/// Runs one scenario to completion and reports its outcome. Mismatches
/// and hard failures both come back as values so concurrent scenarios
/// keep running.
pub(crate) async fn run_one(
    runner: Arc<dyn ScenarioRunner>,
    scenario: &Scenario,
    reporter: &Reporter,
) -> Option<ScenarioFailure> {
    reporter.scenario_started(&scenario.name);
    match runner.run(scenario).await {
        Ok(None) => {
            reporter.scenario_passed(&scenario.name);
            None
        }
        Ok(Some(interaction)) => {
            reporter.scenario_failed(&scenario.name, &interaction);
            Some(ScenarioFailure::Mismatch {
                scenario: scenario.name.clone(),
                interaction: Box::new(interaction),
            })
        }
        Err(error) => {
            reporter.scenario_aborted(&scenario.name, &error);
            Some(ScenarioFailure::Hard {
                scenario: scenario.name.clone(),
                error,
            })
        }
    }
}

#[cfg(test)]
mod pool_test;
