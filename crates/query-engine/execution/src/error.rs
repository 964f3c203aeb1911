//! Errors for query execution.

use query_engine_frame::TranslationError;
use reqwest::StatusCode;
use thiserror::Error;

/// Why a query did not produce a frame.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The service could not be reached.
    #[error("feldera error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("feldera error: request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("query cancelled")]
    Cancelled,
    /// Non-2xx response whose body could not be read.
    #[error("query failed, status: {status}")]
    UnreadableRejection { status: StatusCode },
    /// Non-2xx response; `body` is the service's message, verbatim.
    #[error("query failed, status: '{status}', error: {body}")]
    Rejected { status: StatusCode, body: String },
    /// 2xx response whose body could not be read.
    #[error("query failed, status: '{status}', error: {source}")]
    ResponseRead {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },
    #[error("query failed, status: '{status}', error: {source}")]
    Translation {
        status: StatusCode,
        #[source]
        source: TranslationError,
    },
}

impl ExecutionError {
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ExecutionError::Timeout(error)
        } else {
            ExecutionError::Transport(error)
        }
    }

    /// Short label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionError::Transport(_) => "transport",
            ExecutionError::Timeout(_) => "timeout",
            ExecutionError::Cancelled => "cancelled",
            ExecutionError::UnreadableRejection { .. } | ExecutionError::Rejected { .. } => {
                "rejected"
            }
            ExecutionError::ResponseRead { .. } => "response_read",
            ExecutionError::Translation { .. } => "translation",
        }
    }
}
