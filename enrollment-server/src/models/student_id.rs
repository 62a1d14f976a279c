//! Student identifier
//!
//! Opaque string owned by the Student service. Only emptiness and the
//! column width are checked here; existence is confirmed remotely.

use std::fmt;

use super::ValidationError;

/// Width of the `student_id` column, in characters
const MAX_STUDENT_ID_LEN: usize = 255;

/// Validated, non-empty student identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudentId(String);

impl StudentId {
    /// Create a student id, rejecting empty or oversized values.
    ///
    /// Matching is exact and case-sensitive, so no normalization is applied.
    ///
    /// # Example
    /// ```
    /// use enrollment_server::models::StudentId;
    ///
    /// assert!(StudentId::new("S1").is_ok());
    /// assert!(StudentId::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "student_id" });
        }

        if s.chars().count() > MAX_STUDENT_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "student_id",
                max: MAX_STUDENT_ID_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
