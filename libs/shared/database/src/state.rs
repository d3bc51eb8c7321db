use shared_config::AppConfig;

use crate::database::Database;
use crate::error::StoreError;

/// State shared by every router: configuration plus the record store.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        Self { config, db }
    }

    pub async fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let db = Database::from_config(&config).await?;
        Ok(Self::new(config, db))
    }
}
