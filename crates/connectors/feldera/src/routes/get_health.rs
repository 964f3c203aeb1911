use axum::http::StatusCode;

/// Liveness of the plugin process itself.
pub async fn get_health() -> StatusCode {
    StatusCode::NO_CONTENT
}
