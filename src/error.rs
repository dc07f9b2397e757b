//! Custom error types for Changeling.

use thiserror::Error;

/// Main error type for Changeling operations.
#[derive(Error, Debug)]
pub enum ChangelingError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // Versioning errors
    #[error("Invalid version {version:?}: segment {segment:?} is not a non-negative integer")]
    InvalidVersion { version: String, segment: String },

    #[error("Cannot extract pull request number from fragment name: {0}")]
    InvalidFragmentName(String),

    #[error("Pull request number out of range in fragment name: {0}")]
    FragmentNumberOutOfRange(String),

    #[error(
        "Repository does not have any tags of the form {tag_prefix}N.N.N reachable from HEAD"
    )]
    NoPriorRelease { tag_prefix: String },

    // Changelog errors
    #[error("Pull request #{pr_number} lacks a label for any configured changelog category")]
    CategoryUnresolved { pr_number: u64 },

    #[error(
        "Multiple changelog snippets found in PR, none of which is named {expected:?}: {}",
        found.join(", ")
    )]
    AmbiguousSnippets { expected: String, found: Vec<String> },

    // Forge errors
    #[error("Pull request #{pr_number} does not exist")]
    PullRequestNotFound { pr_number: u64 },

    #[error("GraphQL API error:\n{0}")]
    Api(String),

    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Invalid git remote URL: {0}")]
    InvalidRemoteUrl(String),

    #[error("Git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Parsing errors
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ChangelingError
pub type Result<T> = std::result::Result<T, ChangelingError>;

impl ChangelingError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error naming the offending field
    pub fn invalid_config(
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid version error for the first bad segment
    pub fn invalid_version(
        version: impl Into<String>,
        segment: impl Into<String>,
    ) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            segment: segment.into(),
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for ChangelingError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ChangelingError {
    fn from(err: octocrab::Error) -> Self {
        Self::ForgeError(format!("GitHub API error: {}", err))
    }
}
