//! Release command implementation.
use log::*;
use std::{env, path::PathBuf};
use tokio::io::AsyncWriteExt;

use crate::{
    Result, cli::Args, command::common, orchestrator::release::ReleaseOutcome,
};

/// Environment variable GitHub Actions reads step outputs from.
const GITHUB_OUTPUT_VAR: &str = "GITHUB_OUTPUT";

/// Where `new-version` and `new-tag` outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

impl OutputTarget {
    /// Prefer `--output-file`, then `$GITHUB_OUTPUT`, then stdout.
    pub fn resolve(
        output_file: Option<PathBuf>,
        github_output: Option<String>,
    ) -> Self {
        output_file
            .or_else(|| github_output.filter(|v| !v.is_empty()).map(PathBuf::from))
            .map(OutputTarget::File)
            .unwrap_or(OutputTarget::Stdout)
    }
}

/// `key=value` lines describing the release.
pub fn format_outputs(outcome: &ReleaseOutcome) -> String {
    format!(
        "new-version={}\nnew-tag={}\n",
        outcome.version, outcome.tag
    )
}

/// Append the release outputs to `target`.
pub async fn write_outputs(
    outcome: &ReleaseOutcome,
    target: &OutputTarget,
) -> Result<()> {
    let content = format_outputs(outcome);

    match target {
        OutputTarget::File(path) => {
            debug!("appending release outputs to {}", path.display());
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
        }
        OutputTarget::Stdout => print!("{content}"),
    }

    Ok(())
}

/// Compute and announce the next release, then emit its version.
pub async fn execute(args: &Args, output_file: Option<PathBuf>) -> Result<()> {
    let orchestrator = common::build_orchestrator(args).await?;
    let outcome = orchestrator.release().await?;

    info!(
        "released {} pull requests as {} ({} comments)",
        outcome.pull_requests.len(),
        outcome.tag,
        outcome.comments_posted
    );

    let mut target =
        OutputTarget::resolve(output_file, env::var(GITHUB_OUTPUT_VAR).ok());

    if args.dry_run && target != OutputTarget::Stdout {
        warn!("dry_run: printing release outputs instead of writing them");
        target = OutputTarget::Stdout;
    }

    write_outputs(&outcome, &target).await
}
