//! enrollment-server: validated course enrollments over HTTP
//!
//! Accepts enrollment requests, confirms the student and the course with
//! their owning services, stores accepted enrollments in Postgres, and
//! serves read endpoints over the stored records.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod startup;
pub mod validation;
pub mod workflow;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{EnrollmentRepo, EnrollmentStore, MemoryStore, StoreError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use models::{Enrollment, NewEnrollment, StudentId};
pub use startup::{prepare_storage, RetryPolicy, StartupError};
pub use validation::{HttpValidator, LookupTargets, Validator};
pub use workflow::{EnrollError, EnrollmentWorkflow};
