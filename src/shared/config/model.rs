use std::path::Path;

use serde::Deserialize;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub protocol: ProtocolConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ProtocolConfig {
    /// Transport kind: "rest" or "stream".
    pub kind: String,
    pub url: String,
    /// Streaming only: seconds to wait for further bot events before
    /// declaring the conversation over.
    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: f64,
    /// Rest only: request key carrying the sender id.
    #[serde(default = "default_sender_field")]
    pub sender_field: String,
    /// Rest only: when set, the 1-based turn index is injected into
    /// every render under this variable name.
    pub step_variable: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            chunk_size: default_chunk_size(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ComparisonConfig {
    /// Comma-separated dotted paths excluded from comparison.
    #[serde(default)]
    pub ignored_paths: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

fn default_response_timeout() -> f64 {
    6.0
}

fn default_sender_field() -> String {
    "sender".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_chunk_size() -> usize {
    8
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_stdout_level() -> String {
    "warn".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

pub fn load_settings(config_path: &Path) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::from(config_path))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
