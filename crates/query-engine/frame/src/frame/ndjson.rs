//! Decoding of newline-delimited JSON bodies.
//!
//! The ad-hoc query endpoint streams one JSON object per result row. Each line
//! is decoded on its own, so a row is never split or merged with its
//! neighbours. Blank lines are skipped.

use serde_json::{Map, Value};

use super::error::TranslationError;

pub type Row = Map<String, Value>;

/// Decode every non-blank line of `body` as a JSON object.
pub fn parse_rows(body: &str) -> Result<Vec<Row>, TranslationError> {
    body.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line_number = index + 1;
            match serde_json::from_str(line) {
                Ok(Value::Object(row)) => Ok(row),
                Ok(other) => Err(TranslationError::NotAnObject {
                    line: line_number,
                    found: kind_of(&other),
                }),
                Err(source) => Err(TranslationError::InvalidRow {
                    line: line_number,
                    source,
                }),
            }
        })
        .collect()
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
