//! enrollment-service - course enrollment HTTP service
//!
//! - `serve`: wait for storage, ensure the schema, then serve HTTP
//! - `check-db`: run only the storage startup sequence

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "enrollment-service",
    author,
    version,
    about = "Records course enrollments after confirming the student and course exist"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Wait for the database and create the enrollments table, then exit
    CheckDb(commands::check_db::CheckDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::CheckDb(args) => commands::run_check_db(args).await?,
    }
    Ok(())
}
