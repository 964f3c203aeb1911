use axum::extract::State;
use axum::Json;

use crate::backend::{CheckHealthHandler, CheckHealthRequest, CheckHealthResult};
use crate::health::{SETTINGS_UNAVAILABLE, UNAVAILABLE};
use crate::state::InitializationError;

use super::ServerState;

/// Run the data source health check.
///
/// Every failure, including settings that are missing or cannot be loaded, is
/// reported as an unhealthy result so the configuration page can show why.
pub async fn post_health(
    State(state): State<ServerState>,
    Json(request): Json<CheckHealthRequest>,
) -> Json<CheckHealthResult> {
    let Some(settings) = request.plugin_context.data_source_instance_settings.as_ref() else {
        tracing::warn!("health check without instance settings");
        return Json(CheckHealthResult::unhealthy(SETTINGS_UNAVAILABLE));
    };

    let datasource = match state.instances.get(settings).await {
        Ok(datasource) => datasource,
        Err(InitializationError::ConfigurationError(err)) => {
            tracing::warn!(error = %err, "health check with invalid settings");
            return Json(CheckHealthResult::unhealthy(SETTINGS_UNAVAILABLE));
        }
        Err(err) => {
            tracing::warn!(error = %err, "health check could not create the instance");
            return Json(CheckHealthResult::unhealthy(UNAVAILABLE));
        }
    };

    Json(datasource.check_health(request).await)
}
