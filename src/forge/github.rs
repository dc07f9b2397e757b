//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    ChangelingError, Result,
    forge::{
        config::{DEFAULT_PAGE_SIZE, DEFAULT_REST_PAGE_SIZE, RemoteConfig},
        request::{
            CreateCommentRequest, CreateLabelRequest, PrInfoPage,
            PrInfoPageRequest, RepoLabel, UpdateLabelRequest,
        },
        traits::Forge,
    },
};

pub mod graphql;
pub mod types;

use graphql::{PR_INFO_QUERY, PrInfoQueryVariables, parse_pr_info_response};
use types::{
    CommentPayload, CommentResponse, FILE_STATUS_ADDED, GithubLabel,
    GithubLabelPayload, PullRequestFile,
};

/// GitHub forge implementation using Octocrab for GraphQL and REST calls.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and
    /// API base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_url.trim_end_matches('/').to_string();
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }

    fn repo_endpoint(&self, rest: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_uri, self.config.owner, self.config.repo, rest
        )
    }

    /// Fetch every page of a REST list endpoint.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> octocrab::Result<Vec<T>> {
        let mut items: Vec<T> = vec![];
        let mut page: u32 = 1;

        loop {
            let params = serde_json::json!({
              "per_page": DEFAULT_REST_PAGE_SIZE,
              "page": page,
            });

            let batch: Vec<T> =
                self.instance.get(endpoint, Some(&params)).await?;

            let count = batch.len();
            items.extend(batch);

            if count < DEFAULT_REST_PAGE_SIZE as usize {
                return Ok(items);
            }

            page += 1;
        }
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_pr_info_page(
        &self,
        req: PrInfoPageRequest,
    ) -> Result<PrInfoPage> {
        let vars = PrInfoQueryVariables {
            repo_owner: self.config.owner.clone(),
            repo_name: self.config.repo.clone(),
            prnum: req.pr_number,
            page_size: DEFAULT_PAGE_SIZE,
            closing_cursor: req.closing_cursor,
            label_cursor: req.label_cursor,
        };

        let json = serde_json::json!({
          "query": PR_INFO_QUERY,
          "variables": vars,
        });

        let response: serde_json::Value = self.instance.graphql(&json).await?;

        parse_pr_info_response(req.pr_number, response)
    }

    async fn get_pr_added_files(&self, pr_number: u64) -> Result<Vec<String>> {
        let endpoint = self.repo_endpoint(&format!("pulls/{pr_number}/files"));

        let files: Vec<PullRequestFile> =
            match self.get_all_pages(&endpoint).await {
                Ok(files) => files,
                Err(octocrab::Error::GitHub { source, .. })
                    if source.status_code == StatusCode::NOT_FOUND =>
                {
                    return Err(ChangelingError::PullRequestNotFound {
                        pr_number,
                    });
                }
                Err(err) => return Err(err.into()),
            };

        debug!("pull request #{pr_number} touches {} files", files.len());

        Ok(files
            .into_iter()
            .filter(|f| f.status == FILE_STATUS_ADDED)
            .map(|f| f.filename)
            .collect())
    }

    async fn create_comment(&self, req: CreateCommentRequest) -> Result<()> {
        let endpoint =
            self.repo_endpoint(&format!("issues/{}/comments", req.number));

        let comment: CommentResponse = self
            .instance
            .post(endpoint, Some(&CommentPayload { body: req.body }))
            .await?;

        debug!("created comment {} on #{}", comment.id, req.number);

        Ok(())
    }

    async fn list_labels(&self) -> Result<Vec<RepoLabel>> {
        let endpoint = self.repo_endpoint("labels");
        let labels: Vec<GithubLabel> = self.get_all_pages(&endpoint).await?;
        Ok(labels.into_iter().map(RepoLabel::from).collect())
    }

    async fn create_label(&self, req: CreateLabelRequest) -> Result<RepoLabel> {
        let endpoint = self.repo_endpoint("labels");

        let payload = GithubLabelPayload {
            name: Some(req.name),
            color: req.color,
            description: req.description,
        };

        let label: GithubLabel =
            self.instance.post(endpoint, Some(&payload)).await?;

        Ok(label.into())
    }

    async fn update_label(&self, req: UpdateLabelRequest) -> Result<()> {
        // label names may hold spaces or emoji so build the path segment-wise
        let mut url = Url::parse(&self.base_uri)?;
        url.path_segments_mut()
            .map_err(|_| {
                ChangelingError::forge(format!(
                    "api url cannot be used as a base: {}",
                    self.base_uri
                ))
            })?
            .pop_if_empty()
            .extend([
                "repos",
                &self.config.owner,
                &self.config.repo,
                "labels",
                &req.name,
            ]);

        let payload = GithubLabelPayload {
            name: None,
            color: req.color,
            description: req.description,
        };

        let _: GithubLabel =
            self.instance.patch(url.as_str(), Some(&payload)).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn github(api_url: &str) -> Github {
        Github::new(RemoteConfig {
            host: "github.com".into(),
            scheme: "https".into(),
            owner: "octo".into(),
            repo: "widgets".into(),
            api_url: api_url.into(),
            token: SecretString::from("token".to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn builds_repo_endpoints() {
        let forge = github("https://api.github.com/");
        assert_eq!(
            forge.repo_endpoint("labels"),
            "https://api.github.com/repos/octo/widgets/labels"
        );
    }
}
