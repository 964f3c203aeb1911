//! The contract between the dashboard host and a data source plugin.
//!
//! The host owns the plugin lifecycle. It builds one instance per data source
//! configuration, sends it batches of queries and health checks, and disposes
//! of it when the configuration changes. Neither handler fails as a whole:
//! every problem is reported inside the returned value.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub use feldera_datasource_configuration::DataSourceInstanceSettings;
pub use query_engine_frame::Frame;
pub use query_engine_translation::translation::TimeRange;

/// Who is asking, and with which instance settings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginContext {
    #[serde(default)]
    pub org_id: i64,
    #[serde(default)]
    pub data_source_instance_settings: Option<DataSourceInstanceSettings>,
}

/// One panel query.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    /// Correlates the query with its response; unique within a batch.
    pub ref_id: String,
    /// The query model saved by the editor.
    #[serde(default)]
    pub json: serde_json::Value,
    pub time_range: TimeRange,
    #[serde(default)]
    pub max_data_points: Option<i64>,
    #[serde(default)]
    pub interval_ms: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDataRequest {
    #[serde(default)]
    pub plugin_context: PluginContext,
    pub queries: Vec<DataQuery>,
}

/// One response per query, keyed by `refId`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryDataResponse {
    pub responses: BTreeMap<String, DataResponse>,
}

/// The outcome of a single query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataResponse {
    pub frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: Status,
}

impl DataResponse {
    pub fn ok(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            error: None,
            status: Status::Ok,
        }
    }

    /// Success with nothing to show.
    pub fn empty() -> Self {
        Self::ok(Vec::new())
    }

    pub fn error(status: Status, message: impl Into<String>) -> Self {
        Self {
            frames: Vec::new(),
            error: Some(message.into()),
            status,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Status class of a query response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Ok,
    Cancelled,
    BadRequest,
    ValidationFailed,
    Internal,
    BadGateway,
    Timeout,
}

impl Status {
    /// The HTTP status code this class corresponds to.
    pub fn http_status(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Cancelled => 499,
            Status::BadRequest | Status::ValidationFailed => 400,
            Status::Internal => 500,
            Status::BadGateway => 502,
            Status::Timeout => 504,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckHealthRequest {
    #[serde(default)]
    pub plugin_context: PluginContext,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub message: String,
}

impl CheckHealthResult {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
        }
    }
}

/// Answers batches of queries.
#[async_trait]
pub trait QueryDataHandler: Send + Sync {
    /// Every query in `request` gets exactly one entry in the response. When
    /// `cancellation` fires, queries still in flight report
    /// [`Status::Cancelled`].
    async fn query_data(
        &self,
        request: QueryDataRequest,
        cancellation: CancellationToken,
    ) -> QueryDataResponse;
}

/// Answers the "test connection" button of the configuration page.
#[async_trait]
pub trait CheckHealthHandler: Send + Sync {
    async fn check_health(&self, request: CheckHealthRequest) -> CheckHealthResult;
}

/// Called once when the host drops an instance.
pub trait InstanceDisposer {
    fn dispose(&self);
}
