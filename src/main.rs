use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use convocheck::compare::JsonComparator;
use convocheck::exec::{Reporter, run_chunked, run_pooled};
use convocheck::logging;
use convocheck::runner::rest::RestProfile;
use convocheck::runner::{RestRunner, RunnerKind, ScenarioRunner, StreamRunner};
use convocheck::scenario::loader::SCENARIOS_GLOB;
use convocheck::scenario::{FileFragmentLoader, FileTurnRenderer, load_scenarios};
use convocheck::shared::config::model::CONFIG_FILE;
use convocheck::shared::config::load_settings;
use tracing::info;

const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "convocheck")]
#[command(about = "Replays scripted conversations against a live chatbot backend", long_about = None)]
struct Args {
    /// Test definitions directory holding config.toml plus the
    /// scenarios/, fragments/ and interactions/ folders
    tests_path: PathBuf,

    /// Glob selecting scenario files under scenarios/
    #[arg(default_value = SCENARIOS_GLOB)]
    scenarios_glob: String,

    /// Worker pool width for the rest protocol (overrides config)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Concurrent chunk size for the stream protocol (overrides config)
    #[arg(short = 'k', long)]
    chunk_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = load_settings(&args.tests_path.join(CONFIG_FILE))?;
    logging::init(&settings.logging)?;
    let kind = RunnerKind::from_config(&settings.protocol.kind)?;

    let scenarios = load_scenarios(&args.tests_path, &args.scenarios_glob)?;
    if scenarios.is_empty() {
        eprintln!(
            "No scenarios matching '{}' found under {}",
            args.scenarios_glob,
            args.tests_path.join("scenarios").display()
        );
        std::process::exit(EXIT_FAILURE);
    }
    info!(count = scenarios.len(), protocol = %settings.protocol.kind, "starting run");

    let renderer = Arc::new(FileTurnRenderer::new(&args.tests_path));
    let fragments = Arc::new(FileFragmentLoader::new(&args.tests_path));
    let comparator = Arc::new(JsonComparator::new(&settings.comparison.ignored_paths));

    let total = scenarios.len();
    let (reporter, printer) = Reporter::new();
    let failures = match kind {
        RunnerKind::Rest => {
            let runner: Arc<dyn ScenarioRunner> = Arc::new(RestRunner::new(
                &settings.protocol.url,
                renderer,
                fragments,
                comparator,
                RestProfile {
                    sender_field: settings.protocol.sender_field.clone(),
                    step_variable: settings.protocol.step_variable.clone(),
                },
            )?);
            let workers = args.workers.unwrap_or(settings.runner.workers);
            run_pooled(runner, scenarios, workers, reporter.clone()).await
        }
        RunnerKind::Stream => {
            let runner: Arc<dyn ScenarioRunner> = Arc::new(StreamRunner::new(
                &settings.protocol.url,
                renderer,
                fragments,
                comparator,
                Duration::from_secs_f64(settings.protocol.response_timeout_secs),
            ));
            let chunk_size = args.chunk_size.unwrap_or(settings.runner.chunk_size);
            run_chunked(runner, scenarios, chunk_size, reporter.clone()).await
        }
    };

    reporter.summary(total, failures.len());
    drop(reporter);
    printer.await?;

    if failures.is_empty() {
        Ok(())
    } else {
        std::process::exit(EXIT_FAILURE);
    }
}
