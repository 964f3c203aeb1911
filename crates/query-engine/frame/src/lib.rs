//! Columnar frames built from the rows a Feldera query returns.
//! A frame is what the dashboard renders: named, typed columns of equal length.

pub mod frame;

pub use frame::convert::{frame_from_ndjson, frame_from_rows};
pub use frame::error::TranslationError;
pub use frame::model::{Field, FieldType, FieldValues, Frame};
