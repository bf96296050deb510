use crate::scenario::{FragmentLoader, Interaction, Scenario, ScenarioError, ScenarioStep};

/// Flattens a scenario's steps into the ordered interaction list,
/// inlining fragment references through the loader. Order is file
/// order; fragments expand in place.
pub fn resolve_interactions(
    scenario: &Scenario,
    fragments: &dyn FragmentLoader,
) -> Result<Vec<Interaction>, ScenarioError> {
    let mut interactions = Vec::with_capacity(scenario.steps.len());
    for step in &scenario.steps {
        match step {
            ScenarioStep::Interaction(interaction) => interactions.push(interaction.clone()),
            ScenarioStep::Fragment(reference) => {
                interactions.extend(fragments.scenario_fragment(&reference.name)?);
            }
        }
    }
    Ok(interactions)
}
