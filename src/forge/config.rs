//! Configuration for GitHub connections.
use secrecy::SecretString;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Page size for each paginated sub-collection of the metadata query.
pub const DEFAULT_PAGE_SIZE: u8 = 50;
/// Page size for REST list endpoints.
pub const DEFAULT_REST_PAGE_SIZE: u8 = 100;

/// Remote repository connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Web host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Base URL of the REST API; the GraphQL endpoint hangs off it.
    pub api_url: String,
    /// Access token for authentication.
    pub token: SecretString,
}

impl RemoteConfig {
    /// Web URL of the release page for `tag`.
    pub fn release_link(&self, tag: &str) -> String {
        format!(
            "{}://{}/{}/{}/releases/tag/{}",
            self.scheme, self.host, self.owner, self.repo, tag
        )
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            scheme: "".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}
