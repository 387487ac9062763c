use std::sync::Arc;

use nta_core::{ConfigStore, NewsQuery};
use nta_pipeline::RunRegistry;

pub struct AppState {
    pub registry: Arc<RunRegistry>,
    pub store: Arc<dyn ConfigStore>,
    /// Query used for every run started from the form.
    pub query: NewsQuery,
}

impl AppState {
    pub fn new(registry: Arc<RunRegistry>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            registry,
            store,
            query: NewsQuery::default(),
        }
    }

    pub fn with_query(mut self, query: NewsQuery) -> Self {
        self.query = query;
        self
    }
}
