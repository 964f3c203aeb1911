//! A data source that runs SQL against a Feldera pipeline and returns the
//! rows as frames for a dashboard.

pub mod backend;
pub mod datasource;
pub mod health;
pub mod instances;
pub mod query;
pub mod routes;
pub mod state;
