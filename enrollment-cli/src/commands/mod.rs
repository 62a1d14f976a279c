//! Command implementations for the enrollment service CLI

pub mod check_db;
pub mod serve;
pub mod storage;

// Re-export dispatcher functions for flat access from main.rs
pub use check_db::run_check_db;
pub use serve::run_serve;
