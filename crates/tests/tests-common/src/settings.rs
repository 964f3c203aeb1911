//! Instance settings for tests.

use std::collections::BTreeMap;

use feldera_datasource_configuration::{DataSourceInstanceSettings, API_KEY_FIELD};

pub const PIPELINE: &str = "otel";
pub const API_KEY: &str = "apikey:test-0123456789";

/// Settings pointing at `base_url`, as the host would send them.
pub fn instance_settings(base_url: &str, api_key: Option<&str>) -> DataSourceInstanceSettings {
    DataSourceInstanceSettings {
        id: 1,
        uid: "feldera-test".to_string(),
        name: "Feldera".to_string(),
        updated: 1,
        json_data: serde_json::json!({
            "baseUrl": base_url,
            "pipeline": PIPELINE,
            "timeout": 5,
        }),
        decrypted_secure_json_data: api_key
            .map(|key| BTreeMap::from([(API_KEY_FIELD.to_string(), key.to_string())]))
            .unwrap_or_default(),
    }
}
