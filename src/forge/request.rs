use std::collections::BTreeSet;

use crate::{config::CategoryRule, version::BumpLevel};

/// Pull request author.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Actor {
    pub login: String,
    pub url: String,
}

impl Actor {
    pub fn as_link(&self) -> String {
        format!("[@{}]({})", self.login, self.url)
    }
}

/// Issue a pull request closes when merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Issue {
    pub number: u64,
    pub url: String,
}

impl Issue {
    pub fn as_link(&self) -> String {
        format!("[#{}]({})", self.number, self.url)
    }
}

/// Fully fetched pull request metadata. Only ever built after every page of
/// closing issues and labels has been retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PullRequest {
    pub title: String,
    pub number: u64,
    pub url: String,
    pub author: Actor,
    /// In ascending creation order.
    pub closed_issues: Vec<Issue>,
    pub labels: BTreeSet<String>,
}

impl PullRequest {
    pub fn as_link(&self) -> String {
        format!("[PR #{}]({})", self.number, self.url)
    }

    /// First rule, in declared order, whose label this pull request carries.
    pub fn category<'a>(
        &self,
        rules: &'a [CategoryRule],
    ) -> Option<&'a CategoryRule> {
        rules.iter().find(|rule| {
            rule.label_name()
                .is_some_and(|label| self.labels.contains(label))
        })
    }

    /// Most disruptive bump among every rule whose label this pull request
    /// carries; [`BumpLevel::Patch`] when none match.
    pub fn bump(&self, rules: &[CategoryRule]) -> BumpLevel {
        BumpLevel::highest(
            rules
                .iter()
                .filter(|rule| {
                    rule.label_name()
                        .is_some_and(|label| self.labels.contains(label))
                })
                .map(|rule| rule.bump),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One page of a cursor-paginated sub-collection.
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// A final page with the given nodes.
    pub fn last(nodes: Vec<T>) -> Self {
        Self {
            nodes,
            end_cursor: None,
            has_next_page: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request for one page of pull request metadata.
pub struct PrInfoPageRequest {
    pub pr_number: u64,
    pub closing_cursor: Option<String>,
    pub label_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One response of the pull request metadata query. Scalar fields are the
/// same on every page.
pub struct PrInfoPage {
    pub title: String,
    pub number: u64,
    pub url: String,
    pub author: Actor,
    pub closing_issues: Page<Issue>,
    pub labels: Page<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to comment on a pull request or issue.
pub struct CreateCommentRequest {
    pub number: u64,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A label as it currently exists on the repository.
pub struct RepoLabel {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a repository label.
pub struct CreateLabelRequest {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to change an existing label. Only set fields are sent.
pub struct UpdateLabelRequest {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}
