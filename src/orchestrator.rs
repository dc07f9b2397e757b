//! Coordinates the forge, the local repository and the configuration to
//! carry out each command.
use derive_builder::Builder;
use log::*;
use std::{collections::BTreeSet, rc::Rc};
use tokio::fs;

use crate::{
    ChangelingError, Result,
    changelog::{fragment::scan_fragments, snippet},
    config::Config,
    forge::{manager::ForgeManager, request::CreateCommentRequest},
    git::GitRepository,
    version::highest_version_tag,
};

pub mod labels;
pub mod release;
pub mod snippet_action;

use labels::{LabelChange, plan_label_sync};
use release::{
    ReleaseOutcome, ReleasePlan, ReleaseRun, ReleaseStage, aggregate_bump,
};
use snippet_action::{SnippetAction, decide_snippet_action};

/// Prefix of every commit message the tool creates.
pub const COMMIT_PREFIX: &str = "[changeling]";

#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    pub config: Rc<Config>,
    pub forge: Rc<ForgeManager>,
    pub repo: Rc<dyn GitRepository>,
}

impl OrchestratorParamsBuilder {
    pub fn build(&self) -> Result<Orchestrator> {
        let params = self._build().map_err(|e| {
            ChangelingError::invalid_config(
                "orchestrator",
                format!("Failed to build orchestrator: {}", e),
            )
        })?;
        Ok(Orchestrator::new(params))
    }
}

pub struct Orchestrator {
    config: Rc<Config>,
    forge: Rc<ForgeManager>,
    repo: Rc<dyn GitRepository>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        Self {
            config: params.config,
            forge: params.forge,
            repo: params.repo,
        }
    }

    /// Make sure pull request `pr_number` adds a changelog snippet named
    /// after it, generating or renaming one and committing the result.
    pub async fn add_changelog_snippet(
        &self,
        pr_number: u64,
    ) -> Result<SnippetAction> {
        let added = self.forge.get_pr_added_files(pr_number).await?;

        let action = decide_snippet_action(
            &added,
            &self.config.fragment_directory,
            pr_number,
        )?;

        match &action {
            SnippetAction::Generate { path } => {
                info!(
                    "no pre-existing changelog snippets found in PR; generating one"
                );

                let pr = self.forge.get_pr_info(pr_number).await?;
                let content = snippet::render(&pr, &self.config.categories)?;

                if self.forge.dry_run() {
                    warn!(
                        "dry_run: would write {} and commit it:\n{content}",
                        path.display()
                    );
                    return Ok(action);
                }

                let full_path = self.repo.workdir().join(path);
                if let Some(parent) = full_path.parent() {
                    fs::create_dir_all(parent).await?;
                }
                fs::write(&full_path, content).await?;
                info!("changelog snippet saved to {}", path.display());

                self.repo.add(path)?;
                self.repo.commit(&format!(
                    "{COMMIT_PREFIX} Autogenerate changelog snippet for PR {pr_number}"
                ))?;
            }
            SnippetAction::AlreadyPresent { path } => {
                info!(
                    "changelog snippet {} already present; doing nothing",
                    path.display()
                );
            }
            SnippetAction::Rename { from, to } => {
                info!(
                    "renaming changelog snippet {} to {}",
                    from.display(),
                    to.display()
                );

                if self.forge.dry_run() {
                    warn!(
                        "dry_run: would move {} to {} and commit",
                        from.display(),
                        to.display()
                    );
                    return Ok(action);
                }

                self.repo.mv(from, to)?;
                self.repo.commit(&format!(
                    "{COMMIT_PREFIX} Rename changelog snippet for PR {pr_number}"
                ))?;
            }
        }

        Ok(action)
    }

    /// Fold every pending fragment into the next release version and
    /// announce it on the released pull requests and the issues they close.
    pub async fn release(&self) -> Result<ReleaseOutcome> {
        let mut run = ReleaseRun::default();
        let rules = &self.config.categories;

        let dir = self.repo.workdir().join(&self.config.fragment_directory);
        let fragments = scan_fragments(&dir).await?;

        run.enter(ReleaseStage::Fetching)?;

        let mut seen = BTreeSet::new();
        let mut prs = vec![];

        for fragment in fragments {
            if !seen.insert(fragment.pr_number) {
                warn!(
                    "skipping {}: PR #{} already has a fragment",
                    fragment.path.display(),
                    fragment.pr_number
                );
                continue;
            }

            info!("fetching data for PR #{}", fragment.pr_number);
            let pr = self.forge.get_pr_info(fragment.pr_number).await?;
            info!("PR #{} version bump level: {}", pr.number, pr.bump(rules));
            prs.push(pr);
        }

        run.enter(ReleaseStage::Aggregating)?;

        let bump = aggregate_bump(&prs, rules);
        info!("version bump level for this release: {bump}");

        run.enter(ReleaseStage::Versioning)?;

        let tags = self.repo.tags_merged_into_head()?;
        let previous = highest_version_tag(&tags, &self.config.tag_prefix)?;
        info!("previous released version: {}", previous.version);

        let remote = self.forge.remote_config();
        let plan = ReleasePlan::new(
            &prs,
            bump,
            previous,
            &self.config.tag_prefix,
            |tag| remote.release_link(tag),
        )?;
        info!("new version: {}", plan.version);

        run.enter(ReleaseStage::Notifying)?;

        for notification in plan.notifications.iter() {
            info!("commenting on #{}", notification.number);
            self.forge
                .create_comment(CreateCommentRequest {
                    number: notification.number,
                    body: notification.body.clone(),
                })
                .await?;
        }

        run.enter(ReleaseStage::Done)?;

        Ok(ReleaseOutcome {
            previous_tag: plan.previous.name,
            bump: plan.bump,
            version: plan.version.to_string(),
            tag: plan.tag,
            pull_requests: prs.iter().map(|pr| pr.number).collect(),
            comments_posted: plan.notifications.len(),
        })
    }

    /// Create or update the repository labels the configured categories
    /// refer to.
    pub async fn sync_labels(&self) -> Result<Vec<LabelChange>> {
        let desired = self
            .config
            .categories
            .iter()
            .filter_map(|rule| rule.label.as_ref().map(|l| l.to_spec()))
            .collect::<Vec<_>>();

        info!("fetching current labels");
        let existing = self.forge.list_labels().await?;

        let changes = plan_label_sync(&desired, &existing);

        if changes.is_empty() {
            info!("all {} category labels are up to date", desired.len());
        }

        for change in changes.iter() {
            match change {
                LabelChange::Create(req) => {
                    info!("creating label {:?}", req.name);
                    self.forge.create_label(req.clone()).await?;
                }
                LabelChange::Update(req) => {
                    let fields = [
                        req.color.as_ref().map(|_| "color"),
                        req.description.as_ref().map(|_| "description"),
                    ]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", ");
                    info!("updating {fields} for label {:?}", req.name);
                    self.forge.update_label(req.clone()).await?;
                }
            }
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests;
