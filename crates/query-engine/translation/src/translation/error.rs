//! Errors for translation.

use thiserror::Error;

/// The query JSON does not have the expected shape.
#[derive(Debug, Error)]
#[error("json unmarshal: {0}")]
pub struct MalformedQueryError(#[from] pub serde_json::Error);

/// The request URL could not be built from the instance settings.
#[derive(Debug, Error)]
pub enum RequestConstructionError {
    #[error("failed to create http request: '{0}' cannot be used as a base URL")]
    CannotBeABase(String),
}
