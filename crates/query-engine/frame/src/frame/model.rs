//! The frame data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A named table of equally long, typed columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Number of rows. Every field holds this many values.
    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

/// One column of a frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() == 0
    }

    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }
}

/// The values of a column. `None` is a null.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValues {
    Bool(Vec<Option<bool>>),
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    String(Vec<Option<String>>),
    Time(Vec<Option<DateTime<Utc>>>),
    /// Nested arrays and objects, kept as JSON.
    Json(Vec<Option<serde_json::Value>>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Bool(values) => values.len(),
            FieldValues::Int64(values) => values.len(),
            FieldValues::Float64(values) => values.len(),
            FieldValues::String(values) => values.len(),
            FieldValues::Time(values) => values.len(),
            FieldValues::Json(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValues::Bool(_) => FieldType::Boolean,
            FieldValues::Int64(_) | FieldValues::Float64(_) => FieldType::Number,
            FieldValues::String(_) => FieldType::String,
            FieldValues::Time(_) => FieldType::Time,
            FieldValues::Json(_) => FieldType::Other,
        }
    }

    fn number_type(&self) -> Option<&'static str> {
        match self {
            FieldValues::Int64(_) => Some("int64"),
            FieldValues::Float64(_) => Some("float64"),
            _ => None,
        }
    }
}

impl Serialize for FieldValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.field_type())?;
        if let Some(number_type) = self.number_type() {
            map.serialize_entry("numberType", number_type)?;
        }
        match self {
            FieldValues::Bool(values) => map.serialize_entry("values", values)?,
            FieldValues::Int64(values) => map.serialize_entry("values", values)?,
            FieldValues::Float64(values) => map.serialize_entry("values", values)?,
            FieldValues::String(values) => map.serialize_entry("values", values)?,
            FieldValues::Time(values) => map.serialize_entry("values", values)?,
            FieldValues::Json(values) => map.serialize_entry("values", values)?,
        }
        map.end()
    }
}

/// The type a dashboard sees for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    Number,
    String,
    Time,
    Other,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Time => "time",
            FieldType::Other => "other",
        };
        f.write_str(name)
    }
}
