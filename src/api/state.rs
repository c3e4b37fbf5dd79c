use std::sync::Arc;

use crate::config::Config;
use crate::db::SupabaseClient;
use crate::llm::ModelProvider;

/// Shared, read-only request context.
///
/// Everything here is constructed once at startup and injected into the
/// router; nothing mutates it afterwards, so handlers need no locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: SupabaseClient,
    pub model: Arc<ModelProvider>,
}

impl AppState {
    pub fn new(config: Config, db: SupabaseClient, model: ModelProvider) -> Self {
        Self {
            config: Arc::new(config),
            db,
            model: Arc::new(model),
        }
    }
}
