//! Decoding of the settings the host stores for each data source instance.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::values::Secret;

/// Key of the API key in the decrypted secure settings.
pub const API_KEY_FIELD: &str = "apiKey";

/// Request timeout used when the instance does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Instance settings as the host hands them to the plugin.
///
/// `json_data` is whatever the configuration page saved, and
/// `decrypted_secure_json_data` is the instance's secure store. Only the host
/// can write either of them.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceInstanceSettings {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    /// Last modification of the settings, in milliseconds since the epoch.
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub json_data: serde_json::Value,
    #[serde(default)]
    pub decrypted_secure_json_data: BTreeMap<String, String>,
}

impl fmt::Debug for DataSourceInstanceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceInstanceSettings")
            .field("id", &self.id)
            .field("uid", &self.uid)
            .field("name", &self.name)
            .field("updated", &self.updated)
            .field("json_data", &self.json_data)
            .field(
                "decrypted_secure_json_data",
                &self.decrypted_secure_json_data.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The validated configuration of one data source instance.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSettings {
    /// Root of the Feldera API, e.g. `http://localhost:8080`.
    pub base_url: Url,
    /// Name of the pipeline queries run against.
    pub pipeline_id: String,
    pub api_key: Option<Secret>,
    pub timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonData {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    pipeline: Option<String>,
    /// Seconds.
    #[serde(default)]
    timeout: Option<u64>,
}

/// Load the settings of an instance.
///
/// `json_data` may arrive either as a JSON object or as a string holding the
/// serialized object.
pub fn load_settings(
    settings: &DataSourceInstanceSettings,
) -> Result<InstanceSettings, ConfigError> {
    let json_data: JsonData = match &settings.json_data {
        serde_json::Value::Null => JsonData::default(),
        serde_json::Value::String(raw) if raw.trim().is_empty() => JsonData::default(),
        serde_json::Value::String(raw) => serde_json::from_str(raw)?,
        value => JsonData::deserialize(value)?,
    };

    let base_url = required(json_data.base_url, "baseUrl")?;
    let base_url = parse_base_url(&base_url)?;
    let pipeline_id = required(json_data.pipeline, "pipeline")?;

    let timeout = match json_data.timeout {
        None => DEFAULT_TIMEOUT,
        Some(0) => return Err(ConfigError::InvalidTimeout),
        Some(seconds) => Duration::from_secs(seconds),
    };

    let api_key = settings
        .decrypted_secure_json_data
        .get(API_KEY_FIELD)
        .filter(|key| !key.is_empty())
        .map(|key| Secret::from(key.as_str()));

    Ok(InstanceSettings {
        base_url,
        pipeline_id,
        api_key,
        timeout,
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingField(field))
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a hierarchical URL".to_string()));
    }
    Ok(url)
}
