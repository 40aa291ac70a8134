use std::sync::Arc;

use indexer::{IndexerState, SharedState};

use crate::config::ViewerConfig;

/// Shared application state (thread-safe)
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ViewerConfig>,
    pub indexer: SharedState,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let indexer = Arc::new(IndexerState::new(config.indexer_config()));
        Self {
            config: Arc::new(config),
            indexer,
        }
    }
}
