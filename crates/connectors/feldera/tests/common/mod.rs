//! Common functions used across test cases.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use serde_json::json;

use feldera_datasource::backend::{
    DataQuery, DataSourceInstanceSettings, PluginContext, QueryDataRequest, TimeRange,
};
use feldera_datasource::datasource::{new_datasource, Datasource};
use feldera_datasource::routes::{create_router, ServerState};
use feldera_datasource::instances::InstanceManager;
use feldera_datasource::state::{create_state, State};

pub async fn state() -> State {
    let _ = env_logger::builder().is_test(true).try_init();
    create_state(&mut prometheus::Registry::new()).await.unwrap()
}

/// A data source pointed at `base_url`.
pub async fn datasource(base_url: &str, api_key: Option<&str>) -> Datasource {
    let settings = tests_common::settings::instance_settings(base_url, api_key);
    new_datasource(&settings, &state().await).unwrap()
}

/// A data source built from hand-written settings.
pub async fn datasource_with(settings: &DataSourceInstanceSettings) -> Datasource {
    new_datasource(settings, &state().await).unwrap()
}

/// Creates a router with a fresh state.
pub async fn create_test_router() -> axum::Router {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = prometheus::Registry::new();
    let state = create_state(&mut registry).await.unwrap();
    create_router(ServerState {
        instances: std::sync::Arc::new(InstanceManager::new(state)),
        registry,
    })
}

pub fn time_range() -> TimeRange {
    TimeRange {
        from: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        to: Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
    }
}

pub fn data_query(ref_id: &str, query_text: &str) -> DataQuery {
    data_query_with(ref_id, json!({ "refId": ref_id, "queryText": query_text }))
}

pub fn data_query_with(ref_id: &str, model: serde_json::Value) -> DataQuery {
    DataQuery {
        ref_id: ref_id.to_string(),
        json: model,
        time_range: time_range(),
        max_data_points: Some(1000),
        interval_ms: Some(1000),
    }
}

/// A batch sent without instance settings in the plugin context.
pub fn request(queries: Vec<DataQuery>) -> QueryDataRequest {
    QueryDataRequest {
        plugin_context: PluginContext::default(),
        queries,
    }
}
