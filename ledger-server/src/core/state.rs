use std::sync::Arc;

use sqlx::SqlitePool;

use crate::audit::AuditService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{LogNotifier, Notifier};

/// Shared application state
///
/// Cloned into every handler; all fields are cheap shallow copies
/// (the pool and notifier are `Arc`-backed).
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub audit: AuditService,
    pub notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Open the database at the configured path and assemble the state.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db = DbService::new(&config.db_path()).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// Assemble state over an existing database (tests use in-memory).
    pub fn with_db(config: Config, db: DbService) -> Self {
        let audit = AuditService::new(db.pool.clone());
        Self {
            config,
            db,
            audit,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Swap the notifier implementation.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
