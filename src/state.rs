use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = Db::connect(&config.db).await?;
        Ok(Self { db, config })
    }

    #[cfg(test)]
    pub(crate) fn fake() -> Self {
        use std::time::Duration;

        use crate::config::DbConfig;

        let config = Arc::new(AppConfig {
            db: DbConfig {
                host: "localhost".into(),
                user: "postgres".into(),
                password: "postgres".into(),
                database: "postgres".into(),
                port: 5432,
                max_retries: 3,
                retry_delay: Duration::from_millis(500),
                connect_timeout: Duration::from_secs(5),
            },
            secret_key: "test-secret-key".into(),
            host: "127.0.0.1".into(),
            port: 5000,
        });
        Self {
            db: Db::fake(),
            config,
        }
    }
}
