//! Storage trait shared by the Postgres and in-memory implementations

use async_trait::async_trait;

use crate::models::{Enrollment, StudentId};

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable store for enrollment records.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Append a record and return its newly assigned id.
    async fn insert(&self, student_id: &StudentId, course_id: i32) -> Result<i64, StoreError>;

    /// Every record, ascending by id.
    async fn list_all(&self) -> Result<Vec<Enrollment>, StoreError>;

    /// Records whose student_id exactly equals `student_id`, ascending by id.
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Enrollment>, StoreError>;

    /// Create the enrollments table if it does not exist. Idempotent.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}
