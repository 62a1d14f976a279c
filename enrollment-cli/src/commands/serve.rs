//! HTTP server command for the enrollment service
//!
//! Prepares storage first; the listener is bound only once the
//! enrollments table is known to exist.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use enrollment_server::{run_server, AppState, HttpValidator, LookupTargets, ServerConfig};

use super::storage::StorageArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Base URL of the Student service (lookups hit {url}/students/{id})
    #[arg(long, env = "STUDENT_SERVICE_URL", default_value = "http://student-service:3000")]
    pub student_service_url: String,

    /// Base URL of the Course service (lookups hit {url}/courses/{id})
    #[arg(long, env = "COURSE_SERVICE_URL", default_value = "http://course-service:5000")]
    pub course_service_url: String,

    /// Timeout for each Student/Course lookup, in seconds
    #[arg(long, env = "VALIDATION_TIMEOUT_SECS", default_value = "5")]
    pub validation_timeout_secs: u64,

    /// Upper bound on handling one request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    #[command(flatten)]
    pub storage: StorageArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store = args.storage.open().await?;

    let validator = HttpValidator::new(Duration::from_secs(args.validation_timeout_secs))
        .context("Failed to build lookup HTTP client")?;
    let targets = LookupTargets::new(&args.student_service_url, &args.course_service_url);
    tracing::info!(
        students = %args.student_service_url,
        courses = %args.course_service_url,
        "Collaborator services configured"
    );

    let state = AppState::new(store, Arc::new(validator), targets);
    let config = ServerConfig {
        bind_addr: args.bind,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };

    // Run server (blocks until shutdown)
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
