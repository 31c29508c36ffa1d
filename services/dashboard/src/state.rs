use std::sync::Arc;

use tokio::sync::RwLock;

use datasel::{CachedFetcher, DatasetStore};

use crate::config::AppConfig;
use crate::fixtures::FileFetcher;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: RwLock<DatasetStore>,
    pub fetcher: CachedFetcher<FileFetcher>,
    pub cfg: AppConfig,
}

impl AppState {
    pub fn new(cfg: AppConfig) -> Self {
        let fetcher = CachedFetcher::new(FileFetcher::new(&cfg.fixture_dir), cfg.cache_ttl);
        Self {
            store: RwLock::new(DatasetStore::new()),
            fetcher,
            cfg,
        }
    }
}
