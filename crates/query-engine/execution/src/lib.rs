//! Query execution against a Feldera pipeline.
//!
//! One query is one `GET` on the ad-hoc query endpoint. The outcome is either
//! a frame or an [`error::ExecutionError`] saying which step failed.

pub mod error;
pub mod metrics;
pub mod query;
