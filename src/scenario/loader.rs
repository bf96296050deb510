use std::path::Path;

use tracing::{debug, info};

use crate::scenario::error::ScenarioError;
use crate::scenario::model::Scenario;

pub const SCENARIOS_FOLDER: &str = "scenarios";
pub const SCENARIOS_GLOB: &str = "*.yml";

/// Discovers scenario files under `<tests_path>/scenarios/`, recursing
/// into subdirectories, and parses each one. The scenario name is the
/// file's path relative to the scenarios root with separators replaced
/// by `_` and the extension stripped, so it stays greppable inside
/// sender ids. Results are sorted by name.
pub fn load_scenarios(
    tests_path: &Path,
    scenarios_glob: &str,
) -> Result<Vec<Scenario>, ScenarioError> {
    let scenarios_dir = tests_path.join(SCENARIOS_FOLDER);
    let pattern = format!("{}/**/{}", scenarios_dir.display(), scenarios_glob);

    let paths = glob::glob(&pattern).map_err(|error| ScenarioError::InvalidGlob {
        pattern: pattern.clone(),
        detail: error.to_string(),
    })?;

    let mut scenarios = Vec::new();
    for entry in paths {
        let path = entry.map_err(|error| ScenarioError::Io {
            path: pattern.clone(),
            source: error.into_error(),
        })?;
        if !path.is_file() {
            continue;
        }
        let name = scenario_name(&scenarios_dir, &path);
        debug!(scenario = %name, path = %path.display(), "discovered scenario");
        scenarios.push(Scenario::from_file(name, &path)?);
    }

    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    info!(count = scenarios.len(), "loaded scenarios");
    Ok(scenarios)
}

fn scenario_name(scenarios_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(scenarios_dir).unwrap_or(path);
    let stem = relative.with_extension("");
    stem.components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("_")
}
