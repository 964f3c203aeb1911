use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use prometheus::Encoder;

use super::{ServerError, ServerState};

/// The registry in the Prometheus text format.
pub async fn get_metrics(
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&state.registry.gather(), &mut buffer)
        .map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    ))
}
