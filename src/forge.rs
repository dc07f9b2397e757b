//! Interface to the code-hosting platform.
//!
//! Provides token-based authentication, paginated pull request metadata
//! retrieval, comments and label management through a common trait.

/// Configuration and authentication for the remote.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// Wrapper adding pagination and dry-run handling on top of a forge.
pub mod manager;

/// Cursor state for multi-collection pagination.
pub mod pagination;

/// Shared data types for pull requests, issues, comments and labels.
pub mod request;

/// Common traits for forge platform abstraction.
pub mod traits;
