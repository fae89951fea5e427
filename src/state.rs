use crate::config::{Config, StoreBackend};
use crate::service::LogService;
use crate::storage::{JsonFileStore, LogStore, MemoryStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub logs: LogService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn LogStore>) -> Self {
        Self {
            logs: LogService::new(store, config.reconcile_policy),
            config: Arc::new(config),
        }
    }

    /// State backed by the store the configuration asks for.
    pub fn from_config(config: Config) -> Self {
        let store: Arc<dyn LogStore> = match config.store {
            StoreBackend::File => Arc::new(JsonFileStore::new(config.data_path.clone())),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Self::new(config, store)
    }
}
