//! Traits related to remote git forges
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            CreateCommentRequest, CreateLabelRequest, PrInfoPage,
            PrInfoPageRequest, RepoLabel, UpdateLabelRequest,
        },
    },
};

/// Raw operations against a code-hosting platform. Pagination of the pull
/// request metadata query is driven by the caller, one page per call.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    async fn get_pr_info_page(
        &self,
        req: PrInfoPageRequest,
    ) -> Result<PrInfoPage>;
    /// Paths of files the pull request adds.
    async fn get_pr_added_files(&self, pr_number: u64) -> Result<Vec<String>>;
    async fn create_comment(&self, req: CreateCommentRequest) -> Result<()>;
    async fn list_labels(&self) -> Result<Vec<RepoLabel>>;
    async fn create_label(&self, req: CreateLabelRequest) -> Result<RepoLabel>;
    async fn update_label(&self, req: UpdateLabelRequest) -> Result<()>;
}
