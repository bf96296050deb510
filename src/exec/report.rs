use std::fmt::Write as _;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::runner::{FailedInteraction, RunnerError};

/// Funnels every console line through one printer task, so output from
/// concurrently running scenarios never interleaves mid-block. Clone
/// freely; the printer stops once every clone is dropped.
#[derive(Clone)]
pub struct Reporter {
    lines: mpsc::UnboundedSender<String>,
}

impl Reporter {
    pub fn new() -> (Self, JoinHandle<()>) {
        let (lines, mut sink) = mpsc::unbounded_channel::<String>();
        let printer = tokio::spawn(async move {
            while let Some(block) = sink.recv().await {
                println!("{block}");
            }
        });
        (Self { lines }, printer)
    }

    fn emit(&self, block: String) {
        let _ = self.lines.send(block);
    }

    pub fn scenario_started(&self, name: &str) {
        self.emit(format!("Running scenario '{name}'..."));
    }

    pub fn scenario_passed(&self, name: &str) {
        self.emit(format!("+++ Successfully ran scenario '{name}'!"));
    }

    pub fn scenario_failed(&self, name: &str, failed: &FailedInteraction) {
        let mut block = format!("--- Scenario '{name}' failed the following interaction.\n");
        block.push_str(&format_failed_interaction(failed));
        self.emit(block);
    }

    pub fn scenario_aborted(&self, name: &str, error: &RunnerError) {
        self.emit(format!("--- Scenario '{name}' aborted: {error}"));
    }

    pub fn summary(&self, total: usize, failed: usize) {
        if failed == 0 {
            self.emit(format!("All {total} scenarios passed."));
        } else {
            self.emit(format!("{failed} of {total} scenarios failed."));
        }
    }
}

/// The failing exchange plus a line-per-path rendering of the diff.
/// A path present in both maps displays as a changed value: the `-`
/// line shows what was expected, the `+` line what actually arrived.
pub fn format_failed_interaction(failed: &FailedInteraction) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "User sent:");
    let _ = writeln!(block, "{}", failed.user_input);
    let _ = writeln!(block, "Expected output:");
    let _ = writeln!(block, "{}", failed.expected_output);
    let _ = writeln!(block, "Actual output:");
    let _ = writeln!(block, "{}", failed.actual_output);
    let _ = writeln!(block, "Bot output was different than expected:");

    let diff = &failed.output_diff;
    for (path, value) in &diff.missing_entries {
        let _ = writeln!(block, " - {path}: {value}");
        if let Some(extra_value) = diff.extra_entries.get(path) {
            let _ = writeln!(block, " + {path}: {extra_value}");
        }
    }
    for (path, value) in &diff.extra_entries {
        if !diff.missing_entries.contains_key(path) {
            let _ = writeln!(block, " + {path}: {value}");
        }
    }
    block.push_str("---");
    block
}
