//! Errors raised while loading instance settings.

use thiserror::Error;

/// The instance settings could not be turned into a usable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing required setting '{0}'")]
    MissingField(&'static str),
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("the request timeout must be a positive number of seconds")]
    InvalidTimeout,
}
