use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::exec::report::Reporter;
use crate::exec::{ScenarioFailure, run_one};
use crate::runner::ScenarioRunner;
use crate::scenario::Scenario;

/// Fixed-width worker pool: scenarios are distributed round-robin over
/// `workers` tasks, each of which runs its scenarios to completion one
/// after another. Failures are collected in completion order.
pub async fn run_pooled(
    runner: Arc<dyn ScenarioRunner>,
    scenarios: Vec<Scenario>,
    workers: usize,
    reporter: Reporter,
) -> Vec<ScenarioFailure> {
    let workers = workers.clamp(1, scenarios.len().max(1));
    debug!(workers, scenarios = scenarios.len(), "starting worker pool");

    let (result_sender, mut results) = mpsc::unbounded_channel();
    let mut job_senders = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);

    for _ in 0..workers {
        let (job_sender, mut jobs) = mpsc::unbounded_channel::<Scenario>();
        job_senders.push(job_sender);

        let runner = Arc::clone(&runner);
        let reporter = reporter.clone();
        let result_sender = result_sender.clone();
        handles.push(tokio::spawn(async move {
            while let Some(scenario) = jobs.recv().await {
                if let Some(failure) = run_one(Arc::clone(&runner), &scenario, &reporter).await {
                    let _ = result_sender.send(failure);
                }
            }
        }));
    }
    drop(result_sender);

    for (index, scenario) in scenarios.into_iter().enumerate() {
        let _ = job_senders[index % workers].send(scenario);
    }
    drop(job_senders);

    let mut failures = Vec::new();
    while let Some(failure) = results.recv().await {
        failures.push(failure);
    }
    for handle in handles {
        let _ = handle.await;
    }
    failures
}
