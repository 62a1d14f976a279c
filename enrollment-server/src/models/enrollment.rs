//! Enrollment records and the inbound enroll payload

use serde::{Deserialize, Serialize};

use super::{StudentId, ValidationError};

/// A stored enrollment linking a student to a course.
///
/// `id` is assigned by storage and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: String,
    pub course_id: i32,
}

/// Raw `POST /enroll` body.
///
/// Both fields are required; an `id` supplied by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    pub student_id: String,
    pub course_id: i32,
}

/// Enrollment that passed payload validation but has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub student_id: StudentId,
    pub course_id: i32,
}

impl NewEnrollment {
    /// Attach the storage-assigned id.
    pub fn into_enrollment(self, id: i64) -> Enrollment {
        Enrollment {
            id,
            student_id: self.student_id.into_inner(),
            course_id: self.course_id,
        }
    }
}

impl TryFrom<EnrollRequest> for NewEnrollment {
    type Error = ValidationError;

    fn try_from(req: EnrollRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            student_id: StudentId::new(&req.student_id)?,
            course_id: req.course_id,
        })
    }
}
