//! Health check for the data source.

use super::backend::{CheckHealthResult, PluginContext};
use super::datasource::Datasource;
use super::query::api_key;

use query_engine_translation::translation::request;

pub const HEALTHY: &str = "Data source is working";
pub const SETTINGS_UNAVAILABLE: &str = "Unable to load settings";
pub const REQUEST_FAILED: &str = "Unable to create HTTP request";
pub const UNAVAILABLE: &str = "Data source unavailable";
pub const INVALID_RESPONSE: &str = "Invalid response from data source";

/// Check that the Feldera API answers on its pipeline listing.
///
/// The probe carries the API key when one is configured, like queries do.
/// Every failure is reported as unhealthy; nothing is raised to the caller.
pub async fn health_check(
    datasource: &Datasource,
    plugin_context: &PluginContext,
) -> CheckHealthResult {
    datasource.metrics.record_health_check();

    let api_key = match api_key(datasource, plugin_context) {
        Ok(api_key) => api_key,
        Err(err) => {
            tracing::warn!(error = %err, "health check could not load settings");
            return CheckHealthResult::unhealthy(SETTINGS_UNAVAILABLE);
        }
    };

    let url = match request::health_url(&datasource.settings.base_url) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(error = %err, "health check could not build request");
            return CheckHealthResult::unhealthy(REQUEST_FAILED);
        }
    };

    let mut probe = datasource.client.get(url);
    if let Some(api_key) = &api_key {
        probe = probe.bearer_auth(api_key.expose());
    }

    let response = match probe.send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "health check could not reach the service");
            return CheckHealthResult::unhealthy(UNAVAILABLE);
        }
    };

    let status = response.status();
    if !(200..400).contains(&status.as_u16()) {
        tracing::warn!(%status, "health check got an unexpected status");
        return CheckHealthResult::unhealthy(INVALID_RESPONSE);
    }

    CheckHealthResult::healthy(HEALTHY)
}
