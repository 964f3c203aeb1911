//! Per-instance configuration of the Feldera data source.
//!
//! The host hands every data source instance an opaque blob of JSON settings
//! plus a map of decrypted secrets. This crate turns that into an
//! [`InstanceSettings`] value, or a [`ConfigError`] explaining what is wrong.

pub mod error;
pub mod settings;
pub mod values;

pub use error::ConfigError;
pub use settings::{
    load_settings, DataSourceInstanceSettings, InstanceSettings, API_KEY_FIELD, DEFAULT_TIMEOUT,
};
pub use values::Secret;
