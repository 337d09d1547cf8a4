// prism-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(prism::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(prism::infra::yaml),
        help("Check your YAML syntax (indentation, types, unknown keys).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(prism::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid document '{path}': {source}")]
    #[diagnostic(
        code(prism::infra::validation),
        help("A required field is empty or a list that needs entries has none.")
    )]
    Validation {
        path: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(prism::infra::config_missing))]
    ConfigNotFound(String),
}

// `with_context` in the loaders yields anyhow errors; keep the full chain.
impl From<anyhow::Error> for InfrastructureError {
    fn from(err: anyhow::Error) -> Self {
        InfrastructureError::ConfigError(format!("{:#}", err))
    }
}
