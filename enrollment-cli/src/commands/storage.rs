//! Storage selection shared by `serve` and `check-db`

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use enrollment_server::db::create_pool;
use enrollment_server::{
    prepare_storage, DatabaseConfig, EnrollmentRepo, EnrollmentStore, MemoryStore, RetryPolicy,
};

/// Storage connection and startup retry options
#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Full Postgres URL (overrides POSTGRES_HOST/USER/PASSWORD/DB/PORT)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Keep enrollments in memory instead of Postgres (lost on exit).
    /// Database settings are ignored when set.
    #[arg(long)]
    pub memory: bool,

    /// Storage ping attempts before giving up
    #[arg(long, env = "STARTUP_MAX_ATTEMPTS", default_value = "10")]
    pub startup_attempts: u32,

    /// Wait between storage ping attempts, in milliseconds
    #[arg(long, env = "STARTUP_BACKOFF_MS", default_value = "2000")]
    pub startup_backoff_ms: u64,
}

impl StorageArgs {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.startup_attempts,
            backoff: Duration::from_millis(self.startup_backoff_ms),
        }
    }

    /// Resolve the connection string from the flag/env URL or the POSTGRES_* settings.
    fn database_url(&self) -> Result<String> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }

        let config = DatabaseConfig::from_env()
            .context("Database not configured. Set DATABASE_URL or POSTGRES_HOST/USER/PASSWORD/DB")?;
        tracing::info!(host = %config.host, port = config.port, db = %config.name, "Using Postgres");
        Ok(config.connection_url())
    }

    /// Build the store and run the startup sequence against it.
    pub async fn open(&self) -> Result<Arc<dyn EnrollmentStore>> {
        let store: Arc<dyn EnrollmentStore> = if self.memory {
            tracing::warn!("Using in-memory storage; enrollments are lost on exit");
            Arc::new(MemoryStore::new())
        } else {
            let pool = create_pool(&self.database_url()?)
                .context("Invalid database connection settings")?;
            Arc::new(EnrollmentRepo::new(pool))
        };

        prepare_storage(store.as_ref(), self.retry_policy())
            .await
            .context("Storage is not ready")?;

        Ok(store)
    }
}
