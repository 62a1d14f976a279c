//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - One statement per call, no check-then-insert
//! - Deterministic ordering on list operations

pub mod enrollments;

pub use enrollments::EnrollmentRepo;
