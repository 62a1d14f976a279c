//! Run only the startup sequence and exit
//!
//! Useful as a container init step: exits 0 once storage answers and the
//! enrollments table exists.

use anyhow::Result;
use clap::Parser;

use super::storage::StorageArgs;

/// Arguments for the check-db command
#[derive(Parser, Debug)]
pub struct CheckDbArgs {
    #[command(flatten)]
    pub storage: StorageArgs,
}

/// Ping storage and ensure the schema
pub async fn run_check_db(args: CheckDbArgs) -> Result<()> {
    args.storage.open().await?;
    tracing::info!("Storage reachable, schema ready");
    Ok(())
}
