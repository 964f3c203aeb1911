//! The data source instance handed to the host.

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};

use feldera_datasource_configuration::{load_settings, InstanceSettings};
use query_engine_execution::metrics::Metrics;

use super::backend::{
    CheckHealthHandler, CheckHealthRequest, CheckHealthResult, DataSourceInstanceSettings,
    InstanceDisposer, QueryDataHandler, QueryDataRequest, QueryDataResponse,
};
use super::health;
use super::query;
use super::state::{InitializationError, State};

/// A configured Feldera data source.
///
/// The settings never change for the lifetime of an instance; the host
/// builds a new one when they do. The HTTP client is shared by all queries
/// of the instance.
#[derive(Debug)]
pub struct Datasource {
    uid: String,
    pub(crate) settings: InstanceSettings,
    pub(crate) client: reqwest::Client,
    pub(crate) metrics: Metrics,
}

/// Build a data source instance from the settings the host stored for it.
pub fn new_datasource(
    instance_settings: &DataSourceInstanceSettings,
    state: &State,
) -> Result<Datasource, InitializationError> {
    let settings = load_settings(instance_settings)?;

    let client = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()
        .map_err(InitializationError::HttpClient)?;

    tracing::info!(
        meta.signal_type = "log",
        event.domain = "feldera",
        event.name = "Instance created",
        uid = %instance_settings.uid,
        base_url = %settings.base_url,
        pipeline = %settings.pipeline_id,
        authenticated = settings.api_key.is_some(),
    );

    Ok(Datasource {
        uid: instance_settings.uid.clone(),
        settings,
        client,
        metrics: state.metrics.clone(),
    })
}

impl Datasource {
    pub fn settings(&self) -> &InstanceSettings {
        &self.settings
    }
}

#[async_trait]
impl QueryDataHandler for Datasource {
    /// Queries of a batch are independent, so they run concurrently. Each
    /// result is attributed to its own `refId` whatever the order they finish in.
    async fn query_data(
        &self,
        request: QueryDataRequest,
        cancellation: CancellationToken,
    ) -> QueryDataResponse {
        let QueryDataRequest {
            plugin_context,
            queries,
        } = request;
        let plugin_context = &plugin_context;
        let cancellation = &cancellation;

        let responses = join_all(queries.into_iter().map(|data_query| async move {
            let ref_id = data_query.ref_id.clone();
            let span = info_span!("Query", ref_id = %ref_id);
            let response = query::query(self, plugin_context, data_query, cancellation)
                .instrument(span)
                .await;
            (ref_id, response)
        }))
        .await;

        QueryDataResponse {
            responses: responses.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CheckHealthHandler for Datasource {
    async fn check_health(&self, request: CheckHealthRequest) -> CheckHealthResult {
        health::health_check(self, &request.plugin_context)
            .instrument(info_span!("Health check"))
            .await
    }
}

impl InstanceDisposer for Datasource {
    fn dispose(&self) {
        // Nothing is held beyond the HTTP client, which goes with the last reference.
        tracing::info!(
            meta.signal_type = "log",
            event.domain = "feldera",
            event.name = "Instance disposed",
            uid = %self.uid,
        );
    }
}
