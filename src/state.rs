use std::sync::Arc;

use crate::{classifier::Classifier, config::AppConfig, db::DbPool};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub classifier: Arc<Classifier>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let classifier = Classifier::new(config.model_path.clone());
        Self {
            pool,
            config: Arc::new(config),
            classifier: Arc::new(classifier),
        }
    }
}
