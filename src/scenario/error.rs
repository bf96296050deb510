use thiserror::Error;

/// Failures while loading scenario, fragment, or template definitions
/// from disk. Each variant names the offending file so a broken test
/// tree points straight at its cause.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The scenario document is not a list of steps.
    #[error("Invalid scenario format: {0}")]
    InvalidFormat(String),

    /// A step is neither an interaction nor a fragment reference.
    #[error("Invalid scenario step definition: {step} ({path})")]
    InvalidStep { step: String, path: String },

    #[error("Fragment '{name}' not found at {path}")]
    FragmentNotFound { name: String, path: String },

    /// Fragments are inlined one level deep; a fragment referencing
    /// another fragment (or any non-interaction step) is rejected.
    #[error("Fragment '{name}' may only contain interactions, found: {step}")]
    UnsupportedFragmentStep { name: String, step: String },

    #[error("Invalid scenarios glob '{pattern}': {detail}")]
    InvalidGlob { pattern: String, detail: String },
}
