use std::sync::Arc;

use crate::{
    config::Config,
    services::{HistoryStore, LookupEngine},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable after startup, shared without locking
    pub engine: Arc<LookupEngine>,
    pub history: HistoryStore,
    pub default_k: i64,
}

impl AppState {
    /// Creates state around an already loaded engine
    pub fn new(engine: LookupEngine, config: &Config) -> Self {
        Self {
            engine: Arc::new(engine),
            history: HistoryStore::new(config.history_limit, config.max_sessions),
            default_k: config.default_k,
        }
    }
}
