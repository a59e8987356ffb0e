use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Install directory validation failed: {0}")]
    InstallDir(String),

    #[error("Package manager execution failed: {0}")]
    Execution(String),

    #[error("Field '{field}' missing from outdated report for '{package}'")]
    MissingField { field: String, package: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;
