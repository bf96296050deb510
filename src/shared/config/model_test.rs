use std::fs;

use indoc::indoc;
use tempfile::TempDir;

use crate::shared::config::load_settings;

fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn minimal_config_fills_in_defaults() {
    let (_dir, path) = write_config(indoc! {r#"
        [protocol]
        kind = "rest"
        url = "http://localhost:5005/webhooks/rest/webhook"
    "#});

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.protocol.kind, "rest");
    assert_eq!(settings.protocol.sender_field, "sender");
    assert_eq!(settings.protocol.response_timeout_secs, 6.0);
    assert!(settings.protocol.step_variable.is_none());
    assert_eq!(settings.runner.workers, 4);
    assert_eq!(settings.runner.chunk_size, 8);
    assert_eq!(settings.comparison.ignored_paths, "");
    assert_eq!(settings.logging.stdout_level, "warn");
}

#[test]
fn every_knob_is_overridable() {
    let (_dir, path) = write_config(indoc! {r#"
        [protocol]
        kind = "stream"
        url = "ws://localhost:5005/socket"
        response_timeout_secs = 2.5
        sender_field = "caller"
        step_variable = "step_id"

        [runner]
        workers = 12
        chunk_size = 3

        [comparison]
        ignored_paths = "sender,metadata.trace_id"

        [logging]
        log_dir = "/tmp/logs"
        stdout_level = "info"
        file_level = "trace"
    "#});

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.protocol.kind, "stream");
    assert_eq!(settings.protocol.response_timeout_secs, 2.5);
    assert_eq!(settings.protocol.sender_field, "caller");
    assert_eq!(settings.protocol.step_variable.as_deref(), Some("step_id"));
    assert_eq!(settings.runner.workers, 12);
    assert_eq!(settings.runner.chunk_size, 3);
    assert_eq!(settings.comparison.ignored_paths, "sender,metadata.trace_id");
    assert_eq!(settings.logging.file_level, "trace");
}

#[test]
fn missing_protocol_section_is_an_error() {
    let (_dir, path) = write_config("[runner]\nworkers = 2\n");
    assert!(load_settings(&path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_settings(&dir.path().join("config.toml")).is_err());
}
