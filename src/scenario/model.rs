use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use tracing::debug;

use crate::scenario::error::ScenarioError;
use crate::scenario::interaction::{Interaction, InteractionTurn};

const FRAGMENT_KEY: &str = "fragment";
const USER_KEY: &str = "user";
const BOT_KEY: &str = "bot";
const TEMPLATE_KEY: &str = "template";
const VARIABLES_KEY: &str = "variables";

/// Named reference to a reusable sequence of interactions, inlined at
/// resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentReference {
    pub name: String,
}

impl FragmentReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A scenario step is either a concrete exchange or a fragment
/// reference. The enum is closed: anything else in a scenario file is
/// a parse error, not a runtime dispatch case.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioStep {
    Interaction(Interaction),
    Fragment(FragmentReference),
}

/// A named, ordered script of conversation steps - one end-to-end test
/// case. Parsed once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_file(name: impl Into<String>, path: &Path) -> Result<Self, ScenarioError> {
        let name = name.into();
        let shown_path = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: shown_path.clone(),
            source,
        })?;
        let document: YamlValue =
            serde_yaml::from_str(&text).map_err(|source| ScenarioError::Yaml {
                path: shown_path.clone(),
                source,
            })?;
        let steps = parse_steps(&document, &shown_path)?;
        debug!(scenario = %name, steps = steps.len(), "parsed scenario");
        Ok(Self { name, steps })
    }
}

/// Parses a YAML document as an ordered list of scenario steps.
pub(crate) fn parse_steps(
    document: &YamlValue,
    path: &str,
) -> Result<Vec<ScenarioStep>, ScenarioError> {
    let raw_steps = document
        .as_sequence()
        .ok_or_else(|| ScenarioError::InvalidFormat(path.to_string()))?;
    raw_steps.iter().map(|step| parse_step(step, path)).collect()
}

fn parse_step(step: &YamlValue, path: &str) -> Result<ScenarioStep, ScenarioError> {
    let invalid = || ScenarioError::InvalidStep {
        step: format!("{step:?}"),
        path: path.to_string(),
    };

    let mapping = step.as_mapping().ok_or_else(invalid)?;

    if let Some(fragment) = step.get(FRAGMENT_KEY) {
        if mapping.len() != 1 {
            return Err(invalid());
        }
        let name = fragment.as_str().ok_or_else(invalid)?;
        return Ok(ScenarioStep::Fragment(FragmentReference::new(name)));
    }

    match (step.get(USER_KEY), step.get(BOT_KEY)) {
        (Some(user), Some(bot)) if mapping.len() == 2 => Ok(ScenarioStep::Interaction(
            Interaction::new(parse_turn(user, path)?, parse_turn(bot, path)?),
        )),
        _ => Err(invalid()),
    }
}

fn parse_turn(turn: &YamlValue, path: &str) -> Result<InteractionTurn, ScenarioError> {
    let invalid = || ScenarioError::InvalidStep {
        step: format!("{turn:?}"),
        path: path.to_string(),
    };

    if let Some(template) = turn.as_str() {
        return Ok(InteractionTurn::new(template));
    }

    if !turn.is_mapping() {
        return Err(invalid());
    }
    let template = turn
        .get(TEMPLATE_KEY)
        .and_then(YamlValue::as_str)
        .ok_or_else(invalid)?;

    let mut variables = BTreeMap::new();
    if let Some(raw_variables) = turn.get(VARIABLES_KEY) {
        let variable_map = raw_variables.as_mapping().ok_or_else(invalid)?;
        for (key, value) in variable_map {
            let key = key.as_str().ok_or_else(invalid)?;
            let value: JsonValue = serde_json::to_value(value).map_err(|_| invalid())?;
            variables.insert(key.to_string(), value);
        }
    }

    Ok(InteractionTurn::with_variables(template, variables))
}
