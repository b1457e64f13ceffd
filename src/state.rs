use std::sync::Arc;

use anyhow::Context;

use crate::config::{AppConfig, SessionConfig, DEFAULT_BASE_CATEGORIES};
use crate::session::{MemorySessionStore, PgSessionStore, SessionStore};
use crate::store::{AccountStore, MemoryAccountStore, PgAccountStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let store = Arc::new(PgAccountStore::new(db.clone())) as Arc<dyn AccountStore>;
        let sessions = Arc::new(PgSessionStore::new(db)) as Arc<dyn SessionStore>;

        Ok(Self {
            store,
            sessions,
            config,
        })
    }

    pub fn from_parts(
        store: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            sessions,
            config,
        }
    }

    /// State backed entirely by in-memory stores, for tests.
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            database_url: String::new(),
            session: SessionConfig {
                cookie_name: "sid".into(),
                ttl_minutes: 60,
            },
            base_categories: DEFAULT_BASE_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        });

        Self::from_parts(
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemorySessionStore::new()),
            config,
        )
    }
}
