//! Common functionality shared between commands
use log::*;
use std::{path::Path, rc::Rc};

use crate::{
    Result,
    cli::Args,
    config::Config,
    forge::{
        github::Github,
        manager::{ForgeManager, ForgeOptions},
    },
    git::{GitRepository, LocalRepository},
    orchestrator::Orchestrator,
};

/// Load configuration and connect to the remote and the repository the
/// tool runs in.
pub async fn build_orchestrator(args: &Args) -> Result<Orchestrator> {
    let remote = args.get_remote()?;
    info!("using repository {}/{}", remote.owner, remote.repo);

    let config = Config::load(&args.config).await?;

    let forge = Github::new(remote)?;
    let forge = ForgeManager::new(
        Box::new(forge),
        ForgeOptions {
            dry_run: args.dry_run,
        },
    );

    if args.dry_run {
        warn!("dry_run: no comments, labels, files or commits will be written");
    }

    let repo: Rc<dyn GitRepository> =
        Rc::new(LocalRepository::discover(Path::new("."))?);

    Orchestrator::builder()
        .config(Rc::new(config))
        .forge(Rc::new(forge))
        .repo(repo)
        .build()
}
