use std::path::PathBuf;

use thiserror::Error;

/// The only error that crosses the gateway boundary.
///
/// Transport, upstream-status and payload-shape failures are all collapsed into
/// this message-only form; consumers display it and never branch on its cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while loading a [`GatewayConfig`](crate::config::GatewayConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Env(#[from] shared_utils::env::EnvError),
}
