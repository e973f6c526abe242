use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{DocumentStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        // The store behind the seam is process-local; a managed-backend
        // client implements the same trait.
        let store = Arc::new(MemoryStore::new()) as Arc<dyn DocumentStore>;
        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Fresh empty state for tests.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            config: Arc::new(AppConfig::local()),
        }
    }
}
