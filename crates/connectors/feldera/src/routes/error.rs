use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::InitializationError;

/// Failures that keep a request from reaching a data source instance.
#[derive(Debug)]
pub enum ServerError {
    MissingInstanceSettings,
    InvalidInstanceSettings(String),
    Internal(String),
}

#[derive(Serialize)]
struct JsonErrorResponse {
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::MissingInstanceSettings => (
                StatusCode::BAD_REQUEST,
                "data source instance settings missing from plugin context".to_string(),
            ),
            ServerError::InvalidInstanceSettings(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        tracing::warn!(%status, message = %message, "request rejected");
        (status, Json(JsonErrorResponse { message })).into_response()
    }
}

impl From<InitializationError> for ServerError {
    fn from(value: InitializationError) -> Self {
        match value {
            InitializationError::ConfigurationError(err) => {
                ServerError::InvalidInstanceSettings(err.to_string())
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}
