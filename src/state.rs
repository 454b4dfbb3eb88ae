use std::sync::Arc;

use crate::auth::{
    jwt::JwtKeys,
    repo::{MemoryUserStore, PgUserStore, UserStore},
    AuthService,
};
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => Arc::new(PgUserStore::new(db::connect(&config, url).await?)),
            None => {
                tracing::warn!("DATABASE_URL not set; users are kept in memory");
                Arc::new(MemoryUserStore::new())
            }
        };

        Self::from_parts(config, store)
    }

    pub fn from_parts(config: AppConfig, store: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        let keys = JwtKeys::from(&config.jwt);
        let auth = AuthService::new(store, keys, config.store_timeout())?;
        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
        })
    }

    /// In-memory state for tests.
    pub fn fake() -> Self {
        Self::from_parts(
            AppConfig::for_tests("test-secret"),
            Arc::new(MemoryUserStore::new()),
        )
        .expect("in-memory state")
    }
}
