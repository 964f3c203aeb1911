//! Convert JSON rows into a frame.
//!
//! Columns are created in the order their keys are first seen. A row without
//! a key, or with an explicit `null`, contributes a null to that column. The
//! type of a column is inferred from its non-null values:
//!
//! * booleans become a boolean field,
//! * integers that fit in an `i64` become an `int64` number field, any other
//!   number turns the whole column into `float64`,
//! * strings become a time field when every one of them is a timestamp, and a
//!   string field otherwise,
//! * arrays and objects are kept as JSON.
//!
//! Any other mix of kinds in one column is an error.

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use super::error::TranslationError;
use super::model::{Field, FieldValues, Frame};
use super::ndjson::{self, Row};

/// Build a frame from a newline-delimited JSON body.
pub fn frame_from_ndjson(name: &str, body: &str) -> Result<Frame, TranslationError> {
    let rows = ndjson::parse_rows(body)?;
    frame_from_rows(name, &rows)
}

/// Build a frame from already decoded rows.
pub fn frame_from_rows(name: &str, rows: &[Row]) -> Result<Frame, TranslationError> {
    let mut columns: IndexMap<&str, Vec<Option<&Value>>> = IndexMap::new();

    for (row_index, row) in rows.iter().enumerate() {
        for (key, value) in row {
            let cells = columns
                .entry(key.as_str())
                .or_insert_with(|| vec![None; row_index]);
            cells.push((!value.is_null()).then_some(value));
        }
        for cells in columns.values_mut() {
            if cells.len() == row_index {
                cells.push(None);
            }
        }
    }

    let fields = columns
        .into_iter()
        .map(|(column, cells)| build_field(column, &cells))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Frame {
        name: name.to_string(),
        fields,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Bool,
    Int64,
    Float64,
    String,
    Json,
}

impl Kind {
    fn of(value: &Value) -> Option<Kind> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Kind::Bool),
            Value::Number(number) if number.is_i64() => Some(Kind::Int64),
            Value::Number(_) => Some(Kind::Float64),
            Value::String(_) => Some(Kind::String),
            Value::Array(_) | Value::Object(_) => Some(Kind::Json),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Kind::Bool => "boolean",
            Kind::Int64 | Kind::Float64 => "number",
            Kind::String => "string",
            Kind::Json => "nested",
        }
    }
}

fn infer_kind(column: &str, cells: &[Option<&Value>]) -> Result<Kind, TranslationError> {
    let mut inferred = None;
    for kind in cells.iter().flatten().filter_map(|value| Kind::of(value)) {
        inferred = Some(match (inferred, kind) {
            (None, kind) => kind,
            (Some(seen), kind) if seen == kind => seen,
            (Some(Kind::Int64 | Kind::Float64), Kind::Int64 | Kind::Float64) => Kind::Float64,
            (Some(seen), kind) => {
                return Err(TranslationError::InconsistentSchema {
                    column: column.to_string(),
                    first: seen.describe(),
                    second: kind.describe(),
                })
            }
        });
    }
    // A column holding nothing but nulls has no better type.
    Ok(inferred.unwrap_or(Kind::Json))
}

fn build_field(column: &str, cells: &[Option<&Value>]) -> Result<Field, TranslationError> {
    let values = match infer_kind(column, cells)? {
        Kind::Bool => FieldValues::Bool(collect(cells, Value::as_bool)),
        Kind::Int64 => FieldValues::Int64(collect(cells, Value::as_i64)),
        Kind::Float64 => FieldValues::Float64(collect(cells, Value::as_f64)),
        Kind::String => {
            let strings: Vec<Option<&str>> = collect(cells, Value::as_str);
            let times: Option<Vec<Option<DateTime<Utc>>>> = strings
                .iter()
                .map(|cell| match cell {
                    None => Some(None),
                    Some(text) => parse_timestamp(text).map(Some),
                })
                .collect();
            match times {
                Some(times) => FieldValues::Time(times),
                None => FieldValues::String(
                    strings
                        .into_iter()
                        .map(|cell| cell.map(str::to_string))
                        .collect(),
                ),
            }
        }
        Kind::Json => FieldValues::Json(cells.iter().map(|cell| cell.cloned()).collect()),
    };
    Ok(Field::new(column, values))
}

fn collect<'a, T>(
    cells: &[Option<&'a Value>],
    extract: impl Fn(&'a Value) -> Option<T>,
) -> Vec<Option<T>> {
    cells.iter().map(|cell| cell.and_then(&extract)).collect()
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Timestamps come either as RFC 3339 or, for `TIMESTAMP` columns, without an
/// offset, in which case they are taken to be UTC.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}
