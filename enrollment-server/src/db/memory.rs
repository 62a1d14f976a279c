//! In-memory `EnrollmentStore` for tests and local runs without Postgres

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::store::{EnrollmentStore, StoreError};
use crate::models::{Enrollment, StudentId};

/// Mutex-guarded vector of enrollments with ids starting at 1.
///
/// Failure injection: `fail_pings(n)` makes the next `n` pings fail, and
/// `set_unavailable(true)` makes every operation fail.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Rows>,
    pending_ping_failures: AtomicU32,
    unavailable: AtomicBool,
}

#[derive(Default)]
struct Rows {
    next_id: i64,
    items: Vec<Enrollment>,
    schema_ready: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` pings, then recover.
    pub fn fail_pings(&self, n: u32) {
        self.pending_ping_failures.store(n, Ordering::SeqCst);
    }

    /// Make every operation fail until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Whether `ensure_schema` has been called at least once.
    pub fn schema_ready(&self) -> bool {
        self.lock().map(|rows| rows.schema_ready).unwrap_or(false)
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.lock().map(|rows| rows.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Rows>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn insert(&self, student_id: &StudentId, course_id: i32) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut rows = self.lock()?;
        rows.next_id += 1;
        let id = rows.next_id;
        rows.items.push(Enrollment {
            id,
            student_id: student_id.as_str().to_owned(),
            course_id,
        });
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Enrollment>, StoreError> {
        self.check_available()?;
        Ok(self.lock()?.items.clone())
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Enrollment>, StoreError> {
        self.check_available()?;
        Ok(self
            .lock()?
            .items
            .iter()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check_available()?;
        self.lock()?.schema_ready = true;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()?;
        let failed = self
            .pending_ping_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}
