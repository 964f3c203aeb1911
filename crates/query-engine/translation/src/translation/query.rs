//! The query model stored by the query editor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::MalformedQueryError;

/// The absolute time range selected on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// A query as saved by the editor.
///
/// The editor stores other keys next to `queryText` (`refId`, `datasource`,
/// `hide`, ...). They are ignored here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    #[serde(default)]
    query_text: Option<String>,
}

impl QueryModel {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, MalformedQueryError> {
        Ok(Self::deserialize(value)?)
    }

    /// The raw query template; empty when the editor has not saved any text.
    pub fn query_text(&self) -> &str {
        self.query_text.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.query_text().is_empty()
    }
}
