//! HTTP bridge between the host and the data source.
//!
//! The host talks to the plugin over a handful of JSON endpoints. Each request
//! carries the instance settings it applies to.

mod error;
mod get_health;
mod get_metrics;
mod post_health;
mod post_query;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::instances::InstanceManager;

pub use error::ServerError;
pub use get_health::get_health;
pub use get_metrics::get_metrics;
pub use post_health::post_health;
pub use post_query::post_query;

#[derive(Clone)]
pub struct ServerState {
    pub instances: Arc<InstanceManager>,
    pub registry: prometheus::Registry,
}

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/query", post(post_query))
        .route("/health", get(get_health).post(post_health))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}
