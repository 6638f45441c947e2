/// CLI error types
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot read {path:?}: {source}")]
    Media {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(String),

    #[error(transparent)]
    View(#[from] studio_views::ViewError),

    #[error(transparent)]
    Gateway(#[from] studio_gateway::GatewayError),
}

impl From<config::ConfigError> for CliError {
    fn from(e: config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
