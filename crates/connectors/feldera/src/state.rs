//! Transient state shared by every data source instance.
//!
//! This is initialized on startup.

use thiserror::Error;
use tracing::{info_span, Instrument};

use feldera_datasource_configuration::ConfigError;
use query_engine_execution::metrics;

/// State shared by all instances.
#[derive(Clone, Debug)]
pub struct State {
    pub metrics: metrics::Metrics,
}

/// Register our metrics and wrap them inside a State.
pub async fn create_state(
    metrics_registry: &mut prometheus::Registry,
) -> Result<State, InitializationError> {
    let metrics = async {
        metrics::Metrics::initialize(metrics_registry).map_err(InitializationError::MetricsError)
    }
    .instrument(info_span!("Setup metrics"))
    .await?;

    Ok(State { metrics })
}

/// Instance or state initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
    #[error("unable to build http client: {0}")]
    HttpClient(reqwest::Error),
    #[error("{0}")]
    ConfigurationError(#[from] ConfigError),
}
