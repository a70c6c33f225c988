use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Everything a handler may touch, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self { db, config, jwt }
    }

    /// Migrated in-memory store with a fixed test secret.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let db = db::connect_in_memory()
            .await
            .expect("in-memory database should open");
        let config = Arc::new(
            AppConfig::from_lookup(|key| match key {
                "JWT_SECRET" => Some("test-secret".into()),
                "DATABASE_URL" => Some("sqlite::memory:".into()),
                _ => None,
            })
            .expect("test config is complete"),
        );
        Self::from_parts(db, config)
    }
}
