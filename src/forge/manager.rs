//! Manager that wraps forge implementations
use log::*;
use std::collections::BTreeSet;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        pagination::CursorSet,
        request::{
            CreateCommentRequest, CreateLabelRequest, Issue,
            PrInfoPageRequest, PullRequest, RepoLabel, UpdateLabelRequest,
        },
        traits::Forge,
    },
};

/// Sub-collections of the pull request metadata query, by cursor index.
const CLOSING_ISSUES: usize = 0;
const LABELS: usize = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct ForgeOptions {
    /// Log writes instead of performing them.
    pub dry_run: bool,
}

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
    options: ForgeOptions,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>, options: ForgeOptions) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
            options,
        }
    }

    pub fn remote_config(&self) -> &RemoteConfig {
        &self.remote_config
    }

    pub fn dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Fetch complete metadata for a pull request, following the closing
    /// issue and label cursors independently until both run out.
    pub async fn get_pr_info(&self, pr_number: u64) -> Result<PullRequest> {
        let mut cursors = CursorSet::<2>::default();
        let mut closed_issues: Vec<Issue> = vec![];
        let mut labels: BTreeSet<String> = BTreeSet::new();
        let mut requests = 0;

        loop {
            let page = self
                .forge
                .get_pr_info_page(PrInfoPageRequest {
                    pr_number,
                    closing_cursor: cursors.cursor(CLOSING_ISSUES),
                    label_cursor: cursors.cursor(LABELS),
                })
                .await?;

            requests += 1;

            closed_issues
                .extend(cursors.advance(CLOSING_ISSUES, page.closing_issues)?);
            labels.extend(cursors.advance(LABELS, page.labels)?);

            if !cursors.has_more() {
                debug!(
                    "fetched pull request #{pr_number} in {requests} requests: {} closed issues, {} labels",
                    closed_issues.len(),
                    labels.len()
                );

                return Ok(PullRequest {
                    title: page.title,
                    number: page.number,
                    url: page.url,
                    author: page.author,
                    closed_issues,
                    labels,
                });
            }
        }
    }

    pub async fn get_pr_added_files(
        &self,
        pr_number: u64,
    ) -> Result<Vec<String>> {
        self.forge.get_pr_added_files(pr_number).await
    }

    pub async fn create_comment(&self, req: CreateCommentRequest) -> Result<()> {
        if self.options.dry_run {
            warn!("dry_run: would create comment: req: {:#?}", req);
            return Ok(());
        }
        self.forge.create_comment(req).await
    }

    pub async fn list_labels(&self) -> Result<Vec<RepoLabel>> {
        self.forge.list_labels().await
    }

    pub async fn create_label(
        &self,
        req: CreateLabelRequest,
    ) -> Result<RepoLabel> {
        if self.options.dry_run {
            warn!("dry_run: would create label: req: {:#?}", req);
            return Ok(RepoLabel {
                name: req.name,
                color: req.color.unwrap_or_default(),
                description: req.description,
            });
        }
        self.forge.create_label(req).await
    }

    pub async fn update_label(&self, req: UpdateLabelRequest) -> Result<()> {
        if self.options.dry_run {
            warn!("dry_run: would update label: req: {:#?}", req);
            return Ok(());
        }
        self.forge.update_label(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChangelingError,
        forge::{
            request::{Actor, Page, PrInfoPage},
            traits::MockForge,
        },
    };
    use mockall::Sequence;

    /// Synthetic upstream: `issue_pages` pages of closing issues and
    /// `label_pages` pages of labels, two nodes per page. Once a collection
    /// has been handed its final cursor it answers with an empty last page.
    fn synthetic_page(
        req: &PrInfoPageRequest,
        issue_pages: usize,
        label_pages: usize,
    ) -> PrInfoPage {
        fn page_index(cursor: &Option<String>) -> usize {
            cursor
                .as_deref()
                .map(|c| c.trim_start_matches('p').parse::<usize>().unwrap() + 1)
                .unwrap_or(0)
        }

        fn build<T>(
            index: usize,
            total: usize,
            node: impl Fn(usize) -> T,
        ) -> Page<T> {
            if index >= total {
                return Page::last(vec![]);
            }
            Page {
                nodes: vec![node(index * 2), node(index * 2 + 1)],
                end_cursor: Some(format!("p{index}")),
                has_next_page: index + 1 < total,
            }
        }

        PrInfoPage {
            title: "Add widgets".into(),
            number: req.pr_number,
            url: format!("https://github.com/o/r/pull/{}", req.pr_number),
            author: Actor {
                login: "alice".into(),
                url: "https://github.com/alice".into(),
            },
            closing_issues: build(
                page_index(&req.closing_cursor),
                issue_pages,
                |n| Issue {
                    number: 100 + n as u64,
                    url: format!("https://github.com/o/r/issues/{}", 100 + n),
                },
            ),
            // label "l0" repeats on every page to check de-duplication
            labels: build(page_index(&req.label_cursor), label_pages, |n| {
                if n % 2 == 0 { "l0".into() } else { format!("l{n}") }
            }),
        }
    }

    fn manager_for(issue_pages: usize, label_pages: usize) -> ForgeManager {
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);
        mock_forge
            .expect_get_pr_info_page()
            .times(issue_pages.max(label_pages).max(1))
            .returning(move |req| {
                Ok(synthetic_page(&req, issue_pages, label_pages))
            });
        ForgeManager::new(Box::new(mock_forge), ForgeOptions::default())
    }

    #[tokio::test]
    async fn issues_max_of_page_counts_requests() {
        for (issue_pages, label_pages) in [(1, 1), (3, 1), (1, 4), (2, 5)] {
            let manager = manager_for(issue_pages, label_pages);
            let pr = manager.get_pr_info(7).await.unwrap();

            let expected_issues: Vec<u64> =
                (0..issue_pages as u64 * 2).map(|n| 100 + n).collect();
            assert_eq!(
                pr.closed_issues.iter().map(|i| i.number).collect::<Vec<_>>(),
                expected_issues,
                "issues for ({issue_pages}, {label_pages})"
            );

            let mut expected_labels: BTreeSet<String> = (0..label_pages * 2)
                .filter(|n| n % 2 == 1)
                .map(|n| format!("l{n}"))
                .collect();
            expected_labels.insert("l0".into());
            assert_eq!(pr.labels, expected_labels);
            assert_eq!(pr.title, "Add widgets");
            assert_eq!(pr.author.login, "alice");
        }
    }

    #[tokio::test]
    async fn passes_cursors_independently() {
        let mut seq = Sequence::new();
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);

        let expected = [
            (None, None),
            (Some("p0"), Some("p0")),
            (Some("p0"), Some("p1")),
        ];

        for (closing, label) in expected {
            mock_forge
                .expect_get_pr_info_page()
                .times(1)
                .in_sequence(&mut seq)
                .withf(move |req| {
                    req.closing_cursor.as_deref() == closing
                        && req.label_cursor.as_deref() == label
                })
                .returning(|req| Ok(synthetic_page(&req, 1, 3)));
        }

        let manager =
            ForgeManager::new(Box::new(mock_forge), ForgeOptions::default());
        let pr = manager.get_pr_info(7).await.unwrap();
        assert_eq!(pr.closed_issues.len(), 2);
    }

    #[tokio::test]
    async fn surfaces_not_found_without_retry() {
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);
        mock_forge.expect_get_pr_info_page().times(1).returning(|req| {
            Err(ChangelingError::PullRequestNotFound {
                pr_number: req.pr_number,
            })
        });

        let manager =
            ForgeManager::new(Box::new(mock_forge), ForgeOptions::default());
        let err = manager.get_pr_info(404).await.unwrap_err();
        assert!(matches!(
            err,
            ChangelingError::PullRequestNotFound { pr_number: 404 }
        ));
    }

    #[tokio::test]
    async fn api_error_mid_pagination_aborts() {
        let mut seq = Sequence::new();
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);
        mock_forge
            .expect_get_pr_info_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|req| Ok(synthetic_page(&req, 2, 2)));
        mock_forge
            .expect_get_pr_info_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ChangelingError::Api("{\"errors\":[]}".into())));

        let manager =
            ForgeManager::new(Box::new(mock_forge), ForgeOptions::default());
        let err = manager.get_pr_info(7).await.unwrap_err();
        assert!(matches!(err, ChangelingError::Api(_)));
    }

    #[tokio::test]
    async fn dry_run_skips_writes() {
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);
        mock_forge.expect_create_comment().never();
        mock_forge.expect_create_label().never();
        mock_forge.expect_update_label().never();

        let manager = ForgeManager::new(
            Box::new(mock_forge),
            ForgeOptions { dry_run: true },
        );

        manager
            .create_comment(CreateCommentRequest {
                number: 1,
                body: "hello".into(),
            })
            .await
            .unwrap();

        let label = manager
            .create_label(CreateLabelRequest {
                name: "bug".into(),
                color: Some("ff0000".into()),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(label.color, "ff0000");

        manager
            .update_label(UpdateLabelRequest {
                name: "bug".into(),
                color: None,
                description: Some("".into()),
            })
            .await
            .unwrap();
    }
}
