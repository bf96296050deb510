use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value as YamlValue;
use tracing::debug;

use crate::scenario::error::ScenarioError;
use crate::scenario::interaction::Interaction;
use crate::scenario::model::{self, ScenarioStep};

pub const FRAGMENTS_FOLDER: &str = "fragments";
const FRAGMENT_EXTENSION: &str = "yml";

/// Lookup collaborator for named fragments. Resolution inlines each
/// fragment's interactions exactly one level deep - a fragment cannot
/// pull in further fragments.
pub trait FragmentLoader {
    fn scenario_fragment(&self, name: &str) -> Result<Vec<Interaction>, ScenarioError>;
}

/// Loads fragments from `<tests_path>/fragments/<name>.yml`. Fragment
/// names may contain `/` separators mapping to subdirectories.
pub struct FileFragmentLoader {
    fragments_dir: PathBuf,
}

impl FileFragmentLoader {
    pub fn new(tests_path: &Path) -> Self {
        Self {
            fragments_dir: tests_path.join(FRAGMENTS_FOLDER),
        }
    }
}

impl FragmentLoader for FileFragmentLoader {
    fn scenario_fragment(&self, name: &str) -> Result<Vec<Interaction>, ScenarioError> {
        let path = self
            .fragments_dir
            .join(format!("{name}.{FRAGMENT_EXTENSION}"));
        let shown_path = path.display().to_string();

        let text = fs::read_to_string(&path).map_err(|_| ScenarioError::FragmentNotFound {
            name: name.to_string(),
            path: shown_path.clone(),
        })?;
        let document: YamlValue =
            serde_yaml::from_str(&text).map_err(|source| ScenarioError::Yaml {
                path: shown_path.clone(),
                source,
            })?;

        let steps = model::parse_steps(&document, &shown_path)?;
        let mut interactions = Vec::with_capacity(steps.len());
        for step in steps {
            match step {
                ScenarioStep::Interaction(interaction) => interactions.push(interaction),
                ScenarioStep::Fragment(reference) => {
                    return Err(ScenarioError::UnsupportedFragmentStep {
                        name: name.to_string(),
                        step: format!("fragment: {}", reference.name),
                    });
                }
            }
        }
        debug!(fragment = name, interactions = interactions.len(), "loaded fragment");
        Ok(interactions)
    }
}
