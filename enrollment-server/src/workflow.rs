//! Enrollment creation workflow
//!
//! One request moves through:
//!
//! ```text
//! Received -> StudentValidated -> CourseValidated -> Persisted
//! ```
//!
//! and exits early on the first failed step. Student validation strictly
//! precedes course validation, which strictly precedes the insert. Nothing
//! is written before the final step, so a rejection never needs rollback.

use std::sync::Arc;

use crate::db::{EnrollmentStore, StoreError};
use crate::models::{Enrollment, NewEnrollment};
use crate::validation::{LookupTargets, Validator};

/// Why an enrollment was not created
#[derive(Debug, thiserror::Error)]
pub enum EnrollError {
    #[error("Invalid student ID")]
    InvalidStudent,

    #[error("Invalid course ID")]
    InvalidCourse,

    #[error("failed to persist enrollment: {0}")]
    Persistence(#[source] StoreError),
}

/// Stateless orchestrator shared by all request handlers
#[derive(Clone)]
pub struct EnrollmentWorkflow {
    store: Arc<dyn EnrollmentStore>,
    validator: Arc<dyn Validator>,
    targets: LookupTargets,
}

impl EnrollmentWorkflow {
    pub fn new(
        store: Arc<dyn EnrollmentStore>,
        validator: Arc<dyn Validator>,
        targets: LookupTargets,
    ) -> Self {
        Self {
            store,
            validator,
            targets,
        }
    }

    /// Validate the student, then the course, then store the enrollment.
    ///
    /// Returns the stored enrollment including its assigned id.
    pub async fn enroll(&self, new: NewEnrollment) -> Result<Enrollment, EnrollError> {
        let student_url = self.targets.student_url(new.student_id.as_str());
        if !self.validator.validate(&student_url).await {
            tracing::info!(student_id = %new.student_id, "Enrollment rejected: unknown student");
            return Err(EnrollError::InvalidStudent);
        }
        tracing::debug!(student_id = %new.student_id, "Student validated");

        let course_url = self.targets.course_url(new.course_id);
        if !self.validator.validate(&course_url).await {
            tracing::info!(course_id = new.course_id, "Enrollment rejected: unknown course");
            return Err(EnrollError::InvalidCourse);
        }
        tracing::debug!(course_id = new.course_id, "Course validated");

        let id = self
            .store
            .insert(&new.student_id, new.course_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to persist enrollment");
                EnrollError::Persistence(e)
            })?;

        let enrollment = new.into_enrollment(id);
        tracing::info!(
            id = enrollment.id,
            student_id = %enrollment.student_id,
            course_id = enrollment.course_id,
            "Enrollment created"
        );
        Ok(enrollment)
    }
}
