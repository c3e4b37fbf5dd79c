mod api;
mod provider;
pub mod selection;

pub use api::{GeminiApiClient, ModelInfo};
pub use provider::{ModelBackend, ModelProvider, UNAVAILABLE_MESSAGE};
