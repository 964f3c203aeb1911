//! Answer a single panel query.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use feldera_datasource_configuration::{load_settings, ConfigError, Secret};
use query_engine_execution::error::ExecutionError;
use query_engine_execution::query::{execute, PipelineQuery};
use query_engine_frame::Frame;
use query_engine_translation::translation::error::{MalformedQueryError, RequestConstructionError};
use query_engine_translation::translation::{request, template, QueryModel};

use super::backend::{DataQuery, DataResponse, PluginContext, Status};
use super::datasource::Datasource;

/// Everything that can go wrong with one query. None of it affects the other
/// queries of the batch.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    MalformedQuery(#[from] MalformedQueryError),
    #[error("failed to load http config: {0}")]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    RequestConstruction(#[from] RequestConstructionError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl QueryError {
    pub fn status(&self) -> Status {
        match self {
            QueryError::MalformedQuery(_) => Status::ValidationFailed,
            QueryError::Configuration(_) | QueryError::RequestConstruction(_) => Status::Internal,
            QueryError::Execution(err) => match err {
                ExecutionError::Transport(_) | ExecutionError::UnreadableRejection { .. } => {
                    Status::BadGateway
                }
                ExecutionError::Timeout(_) => Status::Timeout,
                ExecutionError::Cancelled => Status::Cancelled,
                ExecutionError::Rejected { .. } => Status::BadRequest,
                ExecutionError::ResponseRead { .. } | ExecutionError::Translation { .. } => {
                    Status::Internal
                }
            },
        }
    }
}

/// Run one query and fold the outcome into a response.
pub async fn query(
    datasource: &Datasource,
    plugin_context: &PluginContext,
    data_query: DataQuery,
    cancellation: &CancellationToken,
) -> DataResponse {
    match run(datasource, plugin_context, &data_query, cancellation).await {
        Ok(Some(frame)) => DataResponse::ok(vec![frame]),
        Ok(None) => DataResponse::empty(),
        Err(err) => {
            tracing::error!(
                meta.signal_type = "log",
                event.domain = "feldera",
                event.name = "Query error",
                name = "Query error",
                ref_id = %data_query.ref_id,
                body = %err,
                error = true,
            );
            DataResponse::error(err.status(), err.to_string())
        }
    }
}

async fn run(
    datasource: &Datasource,
    plugin_context: &PluginContext,
    data_query: &DataQuery,
    cancellation: &CancellationToken,
) -> Result<Option<Frame>, QueryError> {
    let model = QueryModel::from_json(&data_query.json)?;

    // Blank queries are not sent.
    if model.is_empty() {
        return Ok(None);
    }

    let sql = template::interpolate(model.query_text(), &data_query.time_range);
    tracing::debug!(ref_id = %data_query.ref_id, sql = %sql, "substituted query");

    let url = request::query_url(
        &datasource.settings.base_url,
        &datasource.settings.pipeline_id,
        &sql,
    )?;
    let api_key = api_key(datasource, plugin_context)?;

    let frame = execute(
        &datasource.client,
        &datasource.metrics,
        PipelineQuery {
            ref_id: &data_query.ref_id,
            url,
            api_key: api_key.as_ref(),
        },
        cancellation,
    )
    .await?;

    Ok(Some(frame))
}

/// The API key to authenticate with.
///
/// Settings sent along with the request win over the ones the instance was
/// built with, so a rotated key is picked up before the instance is rebuilt.
pub(crate) fn api_key(
    datasource: &Datasource,
    plugin_context: &PluginContext,
) -> Result<Option<Secret>, ConfigError> {
    match &plugin_context.data_source_instance_settings {
        Some(instance_settings) => Ok(load_settings(instance_settings)?.api_key),
        None => Ok(datasource.settings.api_key.clone()),
    }
}
