//! Errors raised while turning a response body into a frame.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("invalid JSON on line {line}: {source}")]
    InvalidRow {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("row on line {line} is {found}, expected a JSON object")]
    NotAnObject { line: usize, found: &'static str },
    #[error("column '{column}' mixes {first} and {second} values")]
    InconsistentSchema {
        column: String,
        first: &'static str,
        second: &'static str,
    },
}
