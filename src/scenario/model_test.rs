use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use indoc::indoc;
use serde_json::json;
use tempfile::TempDir;

use crate::scenario::{
    FragmentReference, Interaction, InteractionTurn, Scenario, ScenarioError, ScenarioStep,
};

fn write_scenario(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(format!("{name}.yml"));
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn parses_a_simple_scenario_in_file_order() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "simple",
        indoc! {"
            - user: initial_parameters
              bot: welcome
            - user: goodbye
              bot: thank_you
        "},
    );

    let scenario = Scenario::from_file("simple", &path).unwrap();
    assert_eq!(scenario.name, "simple");
    assert_eq!(
        scenario.steps,
        vec![
            ScenarioStep::Interaction(Interaction::new(
                InteractionTurn::new("initial_parameters"),
                InteractionTurn::new("welcome"),
            )),
            ScenarioStep::Interaction(Interaction::new(
                InteractionTurn::new("goodbye"),
                InteractionTurn::new("thank_you"),
            )),
        ]
    );
}

#[test]
fn parses_fragment_references_between_interactions() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "fragmented",
        indoc! {"
            - fragment: introduction
            - user: user1
              bot: bot1
            - fragment: another/fragment
            - user: user2
              bot: bot2
            - fragment: conclusion
        "},
    );

    let scenario = Scenario::from_file("fragmented", &path).unwrap();
    assert_eq!(
        scenario.steps,
        vec![
            ScenarioStep::Fragment(FragmentReference::new("introduction")),
            ScenarioStep::Interaction(Interaction::new(
                InteractionTurn::new("user1"),
                InteractionTurn::new("bot1"),
            )),
            ScenarioStep::Fragment(FragmentReference::new("another/fragment")),
            ScenarioStep::Interaction(Interaction::new(
                InteractionTurn::new("user2"),
                InteractionTurn::new("bot2"),
            )),
            ScenarioStep::Fragment(FragmentReference::new("conclusion")),
        ]
    );
}

#[test]
fn parses_turn_variables() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "interaction_templates",
        indoc! {"
            - user:
                template: welcome_template
                variables:
                  title: Mister
                  name: John
              bot: welcome
            - user: goodbye
              bot:
                template: goodbye_template
                variables:
                  title: Mister
                  name: John
        "},
    );

    let variables: BTreeMap<String, serde_json::Value> = [
        ("title".to_string(), json!("Mister")),
        ("name".to_string(), json!("John")),
    ]
    .into_iter()
    .collect();

    let scenario = Scenario::from_file("interaction_templates", &path).unwrap();
    assert_eq!(
        scenario.steps,
        vec![
            ScenarioStep::Interaction(Interaction::new(
                InteractionTurn::with_variables("welcome_template", variables.clone()),
                InteractionTurn::new("welcome"),
            )),
            ScenarioStep::Interaction(Interaction::new(
                InteractionTurn::new("goodbye"),
                InteractionTurn::with_variables("goodbye_template", variables),
            )),
        ]
    );
}

#[test]
fn non_list_document_is_an_invalid_format() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(&dir, "invalid_not_a_list", "user: hello\nbot: world\n");

    let error = Scenario::from_file("invalid_not_a_list", &path).unwrap_err();
    match error {
        ScenarioError::InvalidFormat(shown) => {
            assert!(shown.contains("invalid_not_a_list.yml"), "got: {shown}")
        }
        other => panic!("expected InvalidFormat, got: {other}"),
    }
}

#[test]
fn unknown_step_shape_is_an_invalid_step() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "invalid_properties",
        indoc! {"
            - user: hello
              robot: world
        "},
    );

    let error = Scenario::from_file("invalid_properties", &path).unwrap_err();
    match error {
        ScenarioError::InvalidStep { path: shown, .. } => {
            assert!(shown.contains("invalid_properties.yml"), "got: {shown}")
        }
        other => panic!("expected InvalidStep, got: {other}"),
    }
}

#[test]
fn extra_keys_next_to_a_fragment_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "invalid_fragment",
        indoc! {"
            - fragment: introduction
              user: hello
        "},
    );

    assert!(matches!(
        Scenario::from_file("invalid_fragment", &path),
        Err(ScenarioError::InvalidStep { .. })
    ));
}
