use serde::{Deserialize, Serialize};

use crate::forge::request::RepoLabel;

/// REST status GitHub reports for files a pull request introduces.
pub const FILE_STATUS_ADDED: &str = "added";

#[derive(Debug, Deserialize)]
pub struct PullRequestFile {
    pub filename: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct GithubLabel {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

impl From<GithubLabel> for RepoLabel {
    fn from(label: GithubLabel) -> Self {
        RepoLabel {
            name: label.name,
            color: label.color,
            description: label.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GithubLabelPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentPayload {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub id: u64,
}
