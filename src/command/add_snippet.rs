//! Changelog snippet command implementation.
use crate::{Result, cli::Args, command::common};

/// Ensure pull request `pr_number` carries a correctly named changelog
/// snippet.
pub async fn execute(args: &Args, pr_number: u64) -> Result<()> {
    let orchestrator = common::build_orchestrator(args).await?;
    orchestrator.add_changelog_snippet(pr_number).await?;
    Ok(())
}
