//! Common test utilities for orchestrator tests.

use std::{collections::BTreeSet, path::PathBuf, rc::Rc};

use crate::{
    config::{CategoryRule, Config},
    forge::{
        config::RemoteConfig,
        manager::{ForgeManager, ForgeOptions},
        request::{Actor, Issue, Page, PrInfoPage, PullRequest},
        traits::MockForge,
    },
    git::{GitRepository, MockGitRepository},
    orchestrator::Orchestrator,
    version::BumpLevel,
};

pub fn test_config() -> Config {
    Config {
        fragment_directory: PathBuf::from("changelog.d"),
        tag_prefix: "v".into(),
        categories: vec![
            CategoryRule::new("💥 Breaking", BumpLevel::Major, Some("major")),
            CategoryRule::new("🚀 Enhancements", BumpLevel::Minor, Some("minor")),
            CategoryRule::new("🐛 Bug Fixes", BumpLevel::Patch, Some("patch")),
        ],
    }
}

pub fn remote_config() -> RemoteConfig {
    RemoteConfig {
        host: "github.com".into(),
        scheme: "https".into(),
        owner: "octo".into(),
        repo: "widgets".into(),
        ..RemoteConfig::default()
    }
}

/// A forge mock that already answers `remote_config`.
pub fn mock_forge() -> MockForge {
    let mut forge = MockForge::new();
    forge.expect_remote_config().returning(remote_config);
    forge
}

/// A repository mock rooted at `workdir`.
pub fn mock_repo(workdir: PathBuf) -> MockGitRepository {
    let mut repo = MockGitRepository::new();
    repo.expect_workdir().returning(move || workdir.clone());
    repo
}

pub fn pull_request(number: u64, labels: &[&str], issues: &[u64]) -> PullRequest {
    PullRequest {
        title: format!("Change number {number}"),
        number,
        url: format!("https://github.com/octo/widgets/pull/{number}"),
        author: Actor {
            login: "alice".into(),
            url: "https://github.com/alice".into(),
        },
        closed_issues: issues
            .iter()
            .map(|n| Issue {
                number: *n,
                url: format!("https://github.com/octo/widgets/issues/{n}"),
            })
            .collect(),
        labels: labels.iter().map(|l| l.to_string()).collect::<BTreeSet<_>>(),
    }
}

/// Single-page metadata response for `pr`.
pub fn single_page(pr: &PullRequest) -> PrInfoPage {
    PrInfoPage {
        title: pr.title.clone(),
        number: pr.number,
        url: pr.url.clone(),
        author: pr.author.clone(),
        closing_issues: Page::last(pr.closed_issues.clone()),
        labels: Page::last(pr.labels.iter().cloned().collect()),
    }
}

pub fn create_test_orchestrator(
    forge: MockForge,
    repo: MockGitRepository,
    config: Config,
    dry_run: bool,
) -> Orchestrator {
    let forge = ForgeManager::new(Box::new(forge), ForgeOptions { dry_run });
    let repo: Rc<dyn GitRepository> = Rc::new(repo);

    Orchestrator::builder()
        .config(Rc::new(config))
        .forge(Rc::new(forge))
        .repo(repo)
        .build()
        .unwrap()
}
