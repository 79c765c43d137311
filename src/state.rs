use std::sync::Arc;

use wayfare_config::{CorsConfig, JwtConfig, ServerConfig, StoreBackend};
use wayfare_observability::MetricsHandle;

use crate::store::{MemoryStore, PgStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub bcrypt_cost: u32,
    pub metrics: Option<MetricsHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &"<redacted>")
            .field("cors_config", &self.cors_config)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            store,
            jwt_config,
            cors_config,
            bcrypt_cost: wayfare_core::password::DEFAULT_BCRYPT_COST,
            metrics: None,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_metrics(mut self, handle: Option<MetricsHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Builds the state for the configured store backend.
pub async fn init_app_state(server_config: &ServerConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn UserStore> = match server_config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for the postgres backend"))?;
            let pool = wayfare_db::init_db_pool(&database_url).await?;
            wayfare_db::run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
    };

    Ok(AppState::new(store, JwtConfig::from_env(), CorsConfig::from_env())
        .with_bcrypt_cost(server_config.bcrypt_cost))
}
