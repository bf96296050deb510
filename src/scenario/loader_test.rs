use std::fs;

use indoc::indoc;
use tempfile::TempDir;

use crate::scenario::load_scenarios;

const MINIMAL_SCENARIO: &str = indoc! {"
    - user: hello
      bot: greeting
"};

fn tests_tree(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for relative in files {
        let path = dir.path().join("scenarios").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, MINIMAL_SCENARIO).unwrap();
    }
    dir
}

#[test]
fn discovers_scenarios_sorted_by_name() {
    let dir = tests_tree(&["zulu.yml", "alpha.yml"]);
    let scenarios = load_scenarios(dir.path(), "*.yml").unwrap();
    let names: Vec<_> = scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zulu"]);
}

#[test]
fn nested_directories_become_underscored_names() {
    let dir = tests_tree(&["billing/refund/success.yml"]);
    let scenarios = load_scenarios(dir.path(), "*.yml").unwrap();
    assert_eq!(scenarios[0].name, "billing_refund_success");
}

#[test]
fn glob_narrows_the_selection() {
    let dir = tests_tree(&["smoke_a.yml", "smoke_b.yml", "full.yml"]);
    let scenarios = load_scenarios(dir.path(), "smoke_*.yml").unwrap();
    assert_eq!(scenarios.len(), 2);
    assert!(scenarios.iter().all(|s| s.name.starts_with("smoke_")));
}

#[test]
fn empty_tree_loads_zero_scenarios() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("scenarios")).unwrap();
    assert!(load_scenarios(dir.path(), "*.yml").unwrap().is_empty());
}
