use axum::extract::State;
use axum::Json;
use tokio_util::sync::CancellationToken;

use crate::backend::{QueryDataHandler, QueryDataRequest, QueryDataResponse};

use super::{ServerError, ServerState};

/// Answer a batch of queries.
///
/// The batch runs inside this handler, so a host that hangs up drops every
/// in-flight pipeline request along with it.
pub async fn post_query(
    State(state): State<ServerState>,
    Json(request): Json<QueryDataRequest>,
) -> Result<Json<QueryDataResponse>, ServerError> {
    let settings = request
        .plugin_context
        .data_source_instance_settings
        .as_ref()
        .ok_or(ServerError::MissingInstanceSettings)?;

    let datasource = state.instances.get(settings).await?;

    tracing::info!(
        meta.signal_type = "log",
        event.domain = "feldera",
        event.name = "Query batch",
        queries = request.queries.len(),
    );

    Ok(Json(datasource.query_data(request, CancellationToken::new()).await))
}
