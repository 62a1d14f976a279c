//! Enrollment repository - Postgres-backed `EnrollmentStore`
//!
//! - insert: single INSERT ... RETURNING id
//! - list/list_by_student: ordered by id, exact match on student_id

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::schema;
use crate::db::store::{EnrollmentStore, StoreError};
use crate::models::{Enrollment, StudentId};

/// Enrollment repository
#[derive(Clone)]
pub struct EnrollmentRepo {
    pool: PgPool,
}

impl EnrollmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentStore for EnrollmentRepo {
    async fn insert(&self, student_id: &StudentId, course_id: i32) -> Result<i64, StoreError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO enrollments (student_id, course_id)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(student_id.as_str())
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Enrollment>, StoreError> {
        let rows = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, student_id, course_id
            FROM enrollments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Enrollment>, StoreError> {
        let rows = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, student_id, course_id
            FROM enrollments
            WHERE student_id = $1
            ORDER BY id
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        schema::ensure_schema(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
