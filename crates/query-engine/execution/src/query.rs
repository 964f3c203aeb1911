//! Execute one query against a pipeline and turn the answer into a frame.

use feldera_datasource_configuration::Secret;
use query_engine_frame::{frame_from_ndjson, Frame};
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};
use url::Url;

use crate::error::ExecutionError;
use crate::metrics::Metrics;

/// A fully translated query, ready to be sent.
#[derive(Clone, Debug)]
pub struct PipelineQuery<'a> {
    /// Names the resulting frame.
    pub ref_id: &'a str,
    pub url: Url,
    pub api_key: Option<&'a Secret>,
}

/// Run a query.
///
/// The request is sent once; there are no retries. If `cancellation` fires
/// before the response is translated, the request is dropped and the query
/// reports [`ExecutionError::Cancelled`].
pub async fn execute(
    client: &reqwest::Client,
    metrics: &Metrics,
    query: PipelineQuery<'_>,
    cancellation: &CancellationToken,
) -> Result<Frame, ExecutionError> {
    let timer = metrics.time_query();

    let result = tokio::select! {
        biased;
        () = cancellation.cancelled() => Err(ExecutionError::Cancelled),
        result = round_trip(client, &query).instrument(info_span!("Execute query")) => result,
    };

    timer.observe_duration();

    match &result {
        Ok(frame) => {
            metrics.record_query_success();
            tracing::debug!(
                ref_id = query.ref_id,
                rows = frame.row_count(),
                fields = frame.fields.len(),
                "query succeeded"
            );
        }
        Err(err) => metrics.record_query_error(err.kind()),
    }

    result
}

async fn round_trip(
    client: &reqwest::Client,
    query: &PipelineQuery<'_>,
) -> Result<Frame, ExecutionError> {
    let mut request = client.get(query.url.clone());
    if let Some(api_key) = query.api_key {
        request = request.bearer_auth(api_key.expose());
    }

    let response = request.send().await.map_err(ExecutionError::transport)?;
    let status = response.status();

    if !status.is_success() {
        return Err(match response.text().await {
            Ok(body) => ExecutionError::Rejected { status, body },
            Err(_) => ExecutionError::UnreadableRejection { status },
        });
    }

    let body = response.text().await.map_err(|source| {
        if source.is_timeout() {
            ExecutionError::Timeout(source)
        } else {
            ExecutionError::ResponseRead { status, source }
        }
    })?;

    async { frame_from_ndjson(query.ref_id, &body) }
        .instrument(info_span!("Create frame"))
        .await
        .map_err(|source| ExecutionError::Translation { status, source })
}
