use std::collections::BTreeMap;

use serde_json::Value;

/// One scripted message: a template reference plus the variables to
/// substitute into it. Equality and hashing are structural, and the
/// ordered map makes variable insertion order irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteractionTurn {
    pub template: String,
    pub variables: BTreeMap<String, Value>,
}

impl InteractionTurn {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: BTreeMap::new(),
        }
    }

    pub fn with_variables(
        template: impl Into<String>,
        variables: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            template: template.into(),
            variables,
        }
    }
}

/// One conversational exchange: the user message and the bot reply
/// expected for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interaction {
    pub user: InteractionTurn,
    pub bot: InteractionTurn,
}

impl Interaction {
    pub fn new(user: InteractionTurn, bot: InteractionTurn) -> Self {
        Self { user, bot }
    }
}
