//! Release aggregation: folds pending fragments into one release decision.
use color_eyre::eyre::eyre;
use log::*;
use std::fmt;

use crate::{
    ChangelingError, Result,
    config::CategoryRule,
    forge::request::PullRequest,
    version::{BumpLevel, Version, VersionTag},
};

/// Phases of a release run. Each run moves strictly forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleaseStage {
    Scanning,
    Fetching,
    Aggregating,
    Versioning,
    Notifying,
    Done,
}

impl ReleaseStage {
    fn next(self) -> Option<ReleaseStage> {
        match self {
            ReleaseStage::Scanning => Some(ReleaseStage::Fetching),
            ReleaseStage::Fetching => Some(ReleaseStage::Aggregating),
            ReleaseStage::Aggregating => Some(ReleaseStage::Versioning),
            ReleaseStage::Versioning => Some(ReleaseStage::Notifying),
            ReleaseStage::Notifying => Some(ReleaseStage::Done),
            ReleaseStage::Done => None,
        }
    }
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseStage::Scanning => "SCANNING",
            ReleaseStage::Fetching => "FETCHING",
            ReleaseStage::Aggregating => "AGGREGATING",
            ReleaseStage::Versioning => "VERSIONING",
            ReleaseStage::Notifying => "NOTIFYING",
            ReleaseStage::Done => "DONE",
        };
        write!(f, "{name}")
    }
}

/// Tracks the stage of a single release run.
#[derive(Debug)]
pub struct ReleaseRun {
    stage: ReleaseStage,
}

impl Default for ReleaseRun {
    fn default() -> Self {
        debug!("release stage: {}", ReleaseStage::Scanning);
        Self {
            stage: ReleaseStage::Scanning,
        }
    }
}

impl ReleaseRun {
    pub fn stage(&self) -> ReleaseStage {
        self.stage
    }

    /// Move to the stage directly after the current one. Skipping or
    /// re-entering a stage is an error.
    pub fn enter(&mut self, stage: ReleaseStage) -> Result<()> {
        if self.stage.next() != Some(stage) {
            return Err(ChangelingError::Other(eyre!(
                "release cannot move from {} to {stage}",
                self.stage
            )));
        }
        debug!("release stage: {} -> {stage}", self.stage);
        self.stage = stage;
        Ok(())
    }
}

/// Most disruptive bump over every pull request; [`BumpLevel::Patch`] when
/// there are none.
pub fn aggregate_bump(prs: &[PullRequest], rules: &[CategoryRule]) -> BumpLevel {
    BumpLevel::highest(prs.iter().map(|pr| pr.bump(rules)))
}

/// A comment to post once the release version is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Pull request or issue number.
    pub number: u64,
    pub body: String,
}

/// Everything decided about a release before any comment is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub previous: VersionTag,
    pub bump: BumpLevel,
    pub version: Version,
    /// Tag the new version will be released under, prefix included.
    pub tag: String,
    pub notifications: Vec<Notification>,
}

impl ReleasePlan {
    /// Decide the next version and the comments announcing it. `prs` must be
    /// in fragment order; comments follow that order, each pull request
    /// before the issues it closes. Fails when the previous version cannot
    /// be bumped.
    pub fn new(
        prs: &[PullRequest],
        bump: BumpLevel,
        previous: VersionTag,
        tag_prefix: &str,
        release_link: impl Fn(&str) -> String,
    ) -> Result<Self> {
        let version = previous.version.bump(bump)?;
        let tag = format!("{tag_prefix}{version}");
        let link = format!("[`{tag}`]({})", release_link(&tag));

        let mut notifications = vec![];
        for pr in prs {
            notifications.push(Notification {
                number: pr.number,
                body: format!("PR released in {link}"),
            });
            for issue in pr.closed_issues.iter() {
                notifications.push(Notification {
                    number: issue.number,
                    body: format!("Issue fixed in {link}"),
                });
            }
        }

        Ok(Self {
            previous,
            bump,
            version,
            tag,
            notifications,
        })
    }
}

/// Result of a completed release run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub previous_tag: String,
    pub bump: BumpLevel,
    pub version: String,
    pub tag: String,
    /// Pull requests included, in fragment order.
    pub pull_requests: Vec<u64>,
    pub comments_posted: usize,
}
