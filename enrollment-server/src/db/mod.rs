//! Storage gateway - connection pool, schema, and enrollment stores
//!
//! # Design Principles
//!
//! - Connection pool shared by all requests - no Arc<Mutex<Connection>>
//! - Every call is its own unit of work, no cross-call transactions
//! - Handlers and the workflow see only the `EnrollmentStore` trait

pub mod memory;
pub mod pool;
pub mod repos;
pub mod schema;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use repos::EnrollmentRepo;
pub use store::{EnrollmentStore, StoreError};
