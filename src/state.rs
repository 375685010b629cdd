use std::sync::Arc;

use crate::config::Config;
use crate::store::{MemoryStore, TimesheetRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn TimesheetRepository>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = MemoryStore::new(config.dataset_size, config.max_sessions);
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}
