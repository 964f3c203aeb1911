//! Translate a panel query into the HTTP request sent to a Feldera pipeline.

pub mod error;
pub mod query;
pub mod request;
pub mod template;

pub use query::{QueryModel, TimeRange};
