use std::fs;

use indoc::indoc;
use tempfile::TempDir;

use crate::scenario::{
    FileFragmentLoader, FragmentLoader, Interaction, InteractionTurn, ScenarioError,
};

fn tests_tree_with_fragment(name: &str, content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fragments").join(format!("{name}.yml"));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    dir
}

#[test]
fn loads_fragment_interactions_in_order() {
    let dir = tests_tree_with_fragment(
        "introduction",
        indoc! {"
            - user: hello
              bot: greeting
            - user: who_are_you
              bot: self_introduction
        "},
    );

    let loader = FileFragmentLoader::new(dir.path());
    let interactions = loader.scenario_fragment("introduction").unwrap();
    assert_eq!(
        interactions,
        vec![
            Interaction::new(
                InteractionTurn::new("hello"),
                InteractionTurn::new("greeting")
            ),
            Interaction::new(
                InteractionTurn::new("who_are_you"),
                InteractionTurn::new("self_introduction")
            ),
        ]
    );
}

#[test]
fn fragment_names_may_span_subdirectories() {
    let dir = tests_tree_with_fragment(
        "another/fragment",
        indoc! {"
            - user: ping
              bot: pong
        "},
    );

    let loader = FileFragmentLoader::new(dir.path());
    assert_eq!(loader.scenario_fragment("another/fragment").unwrap().len(), 1);
}

#[test]
fn missing_fragment_is_reported_by_name() {
    let dir = TempDir::new().unwrap();
    let loader = FileFragmentLoader::new(dir.path());
    match loader.scenario_fragment("nope").unwrap_err() {
        ScenarioError::FragmentNotFound { name, .. } => assert_eq!(name, "nope"),
        other => panic!("expected FragmentNotFound, got: {other}"),
    }
}

#[test]
fn nested_fragment_references_are_rejected() {
    // Flattening is one level deep: a fragment cannot reference another.
    let dir = tests_tree_with_fragment(
        "outer",
        indoc! {"
            - user: hello
              bot: greeting
            - fragment: inner
        "},
    );

    let loader = FileFragmentLoader::new(dir.path());
    match loader.scenario_fragment("outer").unwrap_err() {
        ScenarioError::UnsupportedFragmentStep { name, step } => {
            assert_eq!(name, "outer");
            assert!(step.contains("inner"));
        }
        other => panic!("expected UnsupportedFragmentStep, got: {other}"),
    }
}
