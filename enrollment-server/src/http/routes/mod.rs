//! Route handlers organized by resource

pub mod enrollments;
pub mod health;
