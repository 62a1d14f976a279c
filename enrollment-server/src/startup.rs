//! Startup sequence: wait for storage, then ensure the schema
//!
//! The HTTP listener must not be bound until this succeeds, so handlers
//! never observe a missing table.

use std::time::Duration;

use crate::db::{EnrollmentStore, StoreError};

/// Bounded retry for the storage ping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total ping attempts, including the first
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Fatal startup failure; the process cannot serve without storage
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("storage unreachable after {attempts} attempts: {source}")]
    StorageUnreachable {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("failed to create enrollments table: {0}")]
    Schema(#[source] StoreError),
}

/// Ping storage until it answers, then create the schema.
pub async fn prepare_storage(
    store: &dyn EnrollmentStore,
    policy: RetryPolicy,
) -> Result<(), StartupError> {
    wait_for_storage(store, policy).await?;
    store.ensure_schema().await.map_err(StartupError::Schema)?;
    tracing::info!("Storage ready");
    Ok(())
}

/// Ping storage up to `policy.max_attempts` times, sleeping between failures.
pub async fn wait_for_storage(
    store: &dyn EnrollmentStore,
    policy: RetryPolicy,
) -> Result<(), StartupError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match store.ping().await {
            Ok(()) => {
                tracing::debug!(attempt, "Storage ping succeeded");
                return Ok(());
            }
            Err(e) if attempt >= attempts => {
                tracing::error!(attempts, error = %e, "Storage ping failed, giving up");
                return Err(StartupError::StorageUnreachable {
                    attempts,
                    source: e,
                });
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Waiting for database to be ready... attempt {}/{}",
                    attempt,
                    attempts
                );
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.backoff, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn ready_store_prepares_schema() {
        let store = MemoryStore::new();
        prepare_storage(&store, fast(3)).await.unwrap();
        assert!(store.schema_ready());
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let store = MemoryStore::new();
        store.fail_pings(4);
        prepare_storage(&store, fast(5)).await.unwrap();
        assert!(store.schema_ready());
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let store = MemoryStore::new();
        store.fail_pings(5);

        let err = prepare_storage(&store, fast(5)).await.unwrap_err();
        assert!(matches!(
            err,
            StartupError::StorageUnreachable { attempts: 5, .. }
        ));
        assert!(!store.schema_ready());
    }

    #[tokio::test]
    async fn schema_failure_is_fatal() {
        struct NoSchema;

        #[async_trait::async_trait]
        impl EnrollmentStore for NoSchema {
            async fn insert(
                &self,
                _: &crate::models::StudentId,
                _: i32,
            ) -> Result<i64, StoreError> {
                unreachable!()
            }
            async fn list_all(&self) -> Result<Vec<crate::models::Enrollment>, StoreError> {
                unreachable!()
            }
            async fn list_by_student(
                &self,
                _: &str,
            ) -> Result<Vec<crate::models::Enrollment>, StoreError> {
                unreachable!()
            }
            async fn ensure_schema(&self) -> Result<(), StoreError> {
                Err(StoreError::Unavailable("permission denied".into()))
            }
            async fn ping(&self) -> Result<(), StoreError> {
                Ok(())
            }
        }

        let err = prepare_storage(&NoSchema, fast(1)).await.unwrap_err();
        assert!(matches!(err, StartupError::Schema(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_backoff_between_attempts() {
        let store = MemoryStore::new();
        store.fail_pings(2);
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        };

        let started = tokio::time::Instant::now();
        wait_for_storage(&store, policy).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn zero_attempts_still_pings_once() {
        let store = MemoryStore::new();
        wait_for_storage(&store, fast(0)).await.unwrap();
    }
}
