//! Helpers shared by the integration tests of the workspace.

pub mod mock_pipeline;
pub mod settings;
