//! Table creation for the enrollments store

use sqlx::PgPool;

/// DDL for the single enrollments table. Never altered after creation.
pub const CREATE_ENROLLMENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS enrollments (
        id BIGSERIAL PRIMARY KEY,
        student_id VARCHAR(255) NOT NULL,
        course_id INTEGER NOT NULL
    )
"#;

/// Create the enrollments table if absent. Safe on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring enrollments schema...");
    sqlx::query(CREATE_ENROLLMENTS_TABLE).execute(pool).await?;
    Ok(())
}
