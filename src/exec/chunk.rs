use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::exec::report::Reporter;
use crate::exec::{ScenarioFailure, run_one};
use crate::runner::ScenarioRunner;
use crate::scenario::Scenario;

/// Cooperative regime: scenarios are grouped in declaration order into
/// chunks of `chunk_size`, every scenario in a chunk runs concurrently,
/// and the next chunk starts only once the whole chunk has finished.
/// Peak concurrency is therefore bounded by the chunk size, and the
/// aggregate failure list follows chunk order.
pub async fn run_chunked(
    runner: Arc<dyn ScenarioRunner>,
    scenarios: Vec<Scenario>,
    chunk_size: usize,
    reporter: Reporter,
) -> Vec<ScenarioFailure> {
    let chunk_size = chunk_size.max(1);
    debug!(chunk_size, scenarios = scenarios.len(), "starting chunked run");

    let mut failures = Vec::new();
    for chunk in scenarios.chunks(chunk_size) {
        let outcomes = join_all(
            chunk
                .iter()
                .map(|scenario| run_one(Arc::clone(&runner), scenario, &reporter)),
        )
        .await;
        failures.extend(outcomes.into_iter().flatten());
    }
    failures
}
