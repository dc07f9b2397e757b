use serde::{Deserialize, Serialize};

use crate::{
    ChangelingError, Result,
    forge::request::{Actor, Issue, Page, PrInfoPage},
};

pub const PR_INFO_QUERY: &str = r#"
query GetPullRequestInfo(
  $repo_owner: String!
  $repo_name: String!
  $prnum: Int!
  $page_size: Int!
  $closing_cursor: String
  $label_cursor: String
) {
  repository(owner: $repo_owner, name: $repo_name) {
    pullRequest(number: $prnum) {
      title
      number
      url
      author {
        login
        url
      }
      closingIssuesReferences(
        first: $page_size
        orderBy: { field: CREATED_AT, direction: ASC }
        after: $closing_cursor
      ) {
        nodes {
          number
          url
        }
        pageInfo {
          endCursor
          hasNextPage
        }
      }
      labels(first: $page_size, after: $label_cursor) {
        nodes {
          name
        }
        pageInfo {
          endCursor
          hasNextPage
        }
      }
    }
  }
}"#;

/// Login GitHub reports for deleted accounts.
const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Serialize)]
pub struct PrInfoQueryVariables {
    pub repo_owner: String,
    pub repo_name: String,
    pub prnum: u64,
    pub page_size: u8,
    pub closing_cursor: Option<String>,
    pub label_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    fn into_page<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            nodes: self.nodes.into_iter().map(f).collect(),
            end_cursor: self.page_info.end_cursor,
            has_next_page: self.page_info.has_next_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthorNode {
    pub login: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct IssueNode {
    pub number: u64,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestNode {
    pub title: String,
    pub number: u64,
    pub url: String,
    pub author: Option<AuthorNode>,
    #[serde(rename = "closingIssuesReferences")]
    pub closing_issues_references: Connection<IssueNode>,
    pub labels: Connection<LabelNode>,
}

#[derive(Debug, Deserialize)]
pub struct PrInfoRepository {
    #[serde(rename = "pullRequest")]
    pub pull_request: Option<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub struct PrInfoData {
    pub repository: Option<PrInfoRepository>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

impl GraphqlError {
    fn is_pull_request_not_found(&self) -> bool {
        self.kind.as_deref() == Some("NOT_FOUND")
            && self
                .path
                .iter()
                .any(|p| p.as_str() == Some("pullRequest"))
    }
}

/// Turn a raw GraphQL response body into one page of pull request metadata.
pub fn parse_pr_info_response(
    pr_number: u64,
    body: serde_json::Value,
) -> Result<PrInfoPage> {
    if let Some(errors) = body.get("errors").and_then(|e| e.as_array())
        && !errors.is_empty()
    {
        let not_found = errors
            .iter()
            .filter_map(|e| {
                serde_json::from_value::<GraphqlError>(e.clone()).ok()
            })
            .any(|e| e.is_pull_request_not_found());

        if not_found {
            return Err(ChangelingError::PullRequestNotFound { pr_number });
        }

        return Err(ChangelingError::Api(serde_json::to_string_pretty(
            &body,
        )?));
    }

    let data = body
        .get("data")
        .cloned()
        .ok_or_else(|| ChangelingError::Api(body.to_string()))?;

    let data: PrInfoData = serde_json::from_value(data)?;

    let node = data
        .repository
        .and_then(|r| r.pull_request)
        .ok_or(ChangelingError::PullRequestNotFound { pr_number })?;

    let author = node
        .author
        .map(|a| Actor {
            login: a.login,
            url: a.url,
        })
        .unwrap_or_else(|| Actor {
            login: GHOST_LOGIN.into(),
            url: format!("https://github.com/{GHOST_LOGIN}"),
        });

    Ok(PrInfoPage {
        title: node.title,
        number: node.number,
        url: node.url,
        author,
        closing_issues: node.closing_issues_references.into_page(|n| Issue {
            number: n.number,
            url: n.url,
        }),
        labels: node.labels.into_page(|n| n.name),
    })
}
