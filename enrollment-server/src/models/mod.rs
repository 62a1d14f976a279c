//! Domain models with validation at construction
//!
//! Inbound payloads are validated when converted into these types.
//! Invalid input returns ValidationError, not panic.

pub mod enrollment;
pub mod student_id;
pub mod validation;

pub use enrollment::{EnrollRequest, Enrollment, NewEnrollment};
pub use student_id::StudentId;
pub use validation::ValidationError;
