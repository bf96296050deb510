pub mod error;
pub mod fragment;
pub mod interaction;
pub mod loader;
pub mod model;
pub mod template;

pub use error::ScenarioError;
pub use fragment::{FileFragmentLoader, FragmentLoader};
pub use interaction::{Interaction, InteractionTurn};
pub use loader::load_scenarios;
pub use model::{FragmentReference, Scenario, ScenarioStep};
pub use template::{FileTurnRenderer, RenderError, TurnRenderer};

#[cfg(test)]
mod fragment_test;
#[cfg(test)]
mod loader_test;
#[cfg(test)]
mod model_test;
