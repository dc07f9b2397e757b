//! Label synchronization command implementation.
use log::*;

use crate::{Result, cli::Args, command::common};

/// Create or update the labels of every configured category.
pub async fn execute(args: &Args) -> Result<()> {
    let orchestrator = common::build_orchestrator(args).await?;
    let changes = orchestrator.sync_labels().await?;
    info!("applied {} label changes", changes.len());
    Ok(())
}
