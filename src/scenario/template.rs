use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::scenario::interaction::InteractionTurn;

pub const INTERACTIONS_FOLDER: &str = "interactions";
pub const USER_FOLDER: &str = "user";
pub const BOT_FOLDER: &str = "bot";
const TEMPLATE_EXTENSION: &str = "json";

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("variable pattern"));

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Template '{template}' did not render to valid JSON: {source}")]
    InvalidJson {
        template: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Renders a turn's template with its variable substitutions into a
/// JSON value. `ambient` is the default substitution layer; the turn's
/// own variables override it.
pub trait TurnRenderer {
    fn render_user_turn(
        &self,
        turn: &InteractionTurn,
        ambient: &BTreeMap<String, Value>,
    ) -> Result<Value, RenderError>;

    fn render_bot_turn(
        &self,
        turn: &InteractionTurn,
        ambient: &BTreeMap<String, Value>,
    ) -> Result<Value, RenderError>;
}

/// File-backed template store under
/// `<tests_path>/interactions/{user,bot}/<template>.json`. Templates
/// are JSON documents with `{{name}}` placeholders; strings substitute
/// raw, any other value substitutes as its JSON rendering. An unknown
/// placeholder renders empty, matching how the scripts treat optional
/// ambient values.
pub struct FileTurnRenderer {
    interactions_dir: PathBuf,
}

impl FileTurnRenderer {
    pub fn new(tests_path: &Path) -> Self {
        Self {
            interactions_dir: tests_path.join(INTERACTIONS_FOLDER),
        }
    }

    fn render_turn(
        &self,
        turn: &InteractionTurn,
        folder: &str,
        ambient: &BTreeMap<String, Value>,
    ) -> Result<Value, RenderError> {
        let path = self
            .interactions_dir
            .join(folder)
            .join(format!("{}.{TEMPLATE_EXTENSION}", turn.template));
        if !path.is_file() {
            return Err(RenderError::TemplateNotFound(format!(
                "{folder}/{}",
                turn.template
            )));
        }
        let text = fs::read_to_string(&path).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let rendered = substitute(&text, &turn.template, &turn.variables, ambient);
        serde_json::from_str(&rendered).map_err(|source| RenderError::InvalidJson {
            template: format!("{folder}/{}", turn.template),
            source,
        })
    }
}

impl TurnRenderer for FileTurnRenderer {
    fn render_user_turn(
        &self,
        turn: &InteractionTurn,
        ambient: &BTreeMap<String, Value>,
    ) -> Result<Value, RenderError> {
        self.render_turn(turn, USER_FOLDER, ambient)
    }

    fn render_bot_turn(
        &self,
        turn: &InteractionTurn,
        ambient: &BTreeMap<String, Value>,
    ) -> Result<Value, RenderError> {
        self.render_turn(turn, BOT_FOLDER, ambient)
    }
}

fn substitute(
    text: &str,
    template: &str,
    local: &BTreeMap<String, Value>,
    ambient: &BTreeMap<String, Value>,
) -> String {
    VARIABLE_PATTERN
        .replace_all(text, |captures: &Captures<'_>| {
            let name = &captures[1];
            match local.get(name).or_else(|| ambient.get(name)) {
                Some(Value::String(raw)) => raw.clone(),
                Some(other) => other.to_string(),
                None => {
                    warn!(target: "render", template, variable = name, "unbound template variable");
                    String::new()
                }
            }
        })
        .into_owned()
}
