use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::sleep;

use crate::compare::JsonComparator;
use crate::exec::{Reporter, ScenarioFailure, run_pooled};
use crate::runner::{FailedInteraction, RunnerError, ScenarioRunner};
use crate::scenario::Scenario;

/// Fails every scenario whose name starts with `slow_` after a delay
/// and every `fast_` scenario immediately; passes the rest.
struct StubRunner {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl StubRunner {
    fn new() -> Self {
        Self {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    fn mismatch() -> FailedInteraction {
        let expected = json!({"ok": true});
        let actual = json!({"ok": false});
        FailedInteraction {
            output_diff: JsonComparator::new("").compare(&expected, &actual),
            user_input: json!({}),
            expected_output: expected,
            actual_output: actual,
        }
    }
}

#[async_trait]
impl ScenarioRunner for StubRunner {
    async fn run(&self, scenario: &Scenario) -> Result<Option<FailedInteraction>, RunnerError> {
        let in_flight = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(in_flight, Ordering::SeqCst);
        if scenario.name.starts_with("slow_") {
            sleep(Duration::from_millis(80)).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if scenario.name.starts_with("slow_") || scenario.name.starts_with("fast_") {
            Ok(Some(Self::mismatch()))
        } else {
            Ok(None)
        }
    }
}

fn scenarios(names: &[&str]) -> Vec<Scenario> {
    names
        .iter()
        .map(|name| Scenario {
            name: name.to_string(),
            steps: Vec::new(),
        })
        .collect()
}

#[tokio::test]
async fn pool_width_bounds_concurrency() {
    let runner = Arc::new(StubRunner::new());
    let (reporter, printer) = Reporter::new();

    let failures = run_pooled(
        Arc::clone(&runner) as Arc<dyn ScenarioRunner>,
        scenarios(&["slow_a", "slow_b", "slow_c", "slow_d", "slow_e", "slow_f"]),
        3,
        reporter,
    )
    .await;
    printer.await.unwrap();

    assert_eq!(failures.len(), 6);
    assert!(runner.peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn failures_arrive_in_completion_order() {
    let runner = Arc::new(StubRunner::new());
    let (reporter, printer) = Reporter::new();

    // Two workers: the slow failure lands after the fast one even
    // though it was declared first.
    let failures = run_pooled(
        Arc::clone(&runner) as Arc<dyn ScenarioRunner>,
        scenarios(&["slow_first", "fast_second"]),
        2,
        reporter,
    )
    .await;
    printer.await.unwrap();

    let names: Vec<&str> = failures.iter().map(ScenarioFailure::scenario).collect();
    assert_eq!(names, vec!["fast_second", "slow_first"]);
}

#[tokio::test]
async fn passing_scenarios_produce_no_failures() {
    let runner = Arc::new(StubRunner::new());
    let (reporter, printer) = Reporter::new();

    let failures = run_pooled(runner, scenarios(&["ok_a", "ok_b"]), 4, reporter).await;
    printer.await.unwrap();
    assert!(failures.is_empty());
}
