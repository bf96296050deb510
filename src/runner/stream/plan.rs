use std::collections::BTreeMap;
use std::collections::VecDeque;

use serde_json::Value;

use crate::scenario::template::RenderError;
use crate::scenario::{Interaction, TurnRenderer};

/// One pre-rendered message: either an outbound user turn or one
/// awaited bot message.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    pub is_user: bool,
    pub body: Value,
}

/// The whole scenario, rendered upfront into a flat ordered stack of
/// tagged messages. A bot turn that renders to an array splits into
/// one entry per element, so each incoming event consumes exactly one
/// comparable unit.
#[derive(Debug, Default)]
pub struct MessagePlan {
    entries: VecDeque<PlanEntry>,
}

impl MessagePlan {
    pub fn build(
        interactions: &[Interaction],
        renderer: &dyn TurnRenderer,
        ambient: &BTreeMap<String, Value>,
    ) -> Result<Self, RenderError> {
        let mut entries = VecDeque::new();
        for interaction in interactions {
            entries.push_back(PlanEntry {
                is_user: true,
                body: renderer.render_user_turn(&interaction.user, ambient)?,
            });
            let rendered_bot = renderer.render_bot_turn(&interaction.bot, ambient)?;
            for message in split_messages(rendered_bot) {
                entries.push_back(PlanEntry {
                    is_user: false,
                    body: message,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = PlanEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn front_is_user(&self) -> bool {
        self.entries.front().is_some_and(|entry| entry.is_user)
    }

    pub fn pop(&mut self) -> Option<PlanEntry> {
        self.entries.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Bot messages still awaited, in plan order.
    pub fn remaining_bot_messages(&self) -> Vec<Value> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_user)
            .map(|entry| entry.body.clone())
            .collect()
    }
}

fn split_messages(rendered: Value) -> Vec<Value> {
    match rendered {
        Value::Array(messages) => messages,
        single => vec![single],
    }
}
