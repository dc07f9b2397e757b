//! CLI argument parsing and GitHub remote configuration.
use clap::{Parser, Subcommand};
use git_url_parse::GitUrl;
use regex::Regex;
use secrecy::SecretString;
use std::{env, path::PathBuf, sync::LazyLock};

use crate::{
    ChangelingError, Result,
    config::DEFAULT_CONFIG_FILE,
    forge::config::{DEFAULT_API_URL, RemoteConfig},
};

static REPO_SHORTHAND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<owner>[\w.-]+)/(?<repo>[\w.-]+)$").unwrap()
});

const DEFAULT_HOST: &str = "github.com";

/// Global CLI arguments for remote configuration and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// GitHub repository as owner/name or URL. Falls back to
    /// GITHUB_REPOSITORY env var.
    pub repo: String,

    #[arg(long, default_value = "", global = true)]
    /// GitHub access token. Falls back to GITHUB_TOKEN env var.
    pub token: String,

    #[arg(long, default_value = "", global = true)]
    /// GitHub REST API base URL. Falls back to GITHUB_API_URL env var.
    pub api_url: String,

    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Path to the configuration file.
    pub config: PathBuf,

    #[arg(long, default_value_t = false, global = true)]
    /// Log comments, label changes and commits instead of making them.
    pub dry_run: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Changelog and release subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate, or rename, the changelog snippet for a pull request and
    /// commit it.
    AddChangelogSnippet {
        /// Pull request number.
        pr_number: u64,
    },

    /// Compute the next version from pending snippets and comment on the
    /// released pull requests and issues.
    Release {
        #[arg(long)]
        /// File to append `new-version` and `new-tag` outputs to. Falls back
        /// to GITHUB_OUTPUT env var, then stdout.
        output_file: Option<PathBuf>,
    },

    /// Create or update the labels of every configured category.
    SyncLabels,
}

impl Args {
    /// Configure remote repository connection from CLI arguments and the
    /// environment.
    pub fn get_remote(&self) -> Result<RemoteConfig> {
        resolve_remote(&self.repo, &self.token, &self.api_url, |key| {
            env::var(key).ok()
        })
    }
}

/// Build a [`RemoteConfig`], falling back to `env` for values left empty.
pub fn resolve_remote(
    repo: &str,
    token: &str,
    api_url: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<RemoteConfig> {
    let mut repo = repo.to_string();

    if repo.is_empty()
        && let Some(env_repo) = env("GITHUB_REPOSITORY")
    {
        repo = env_repo;
    }

    if repo.is_empty() {
        return Err(ChangelingError::InvalidArgs(
            "must set --repo or GITHUB_REPOSITORY".into(),
        ));
    }

    let (scheme, host, owner, name, url_token) = parse_repo(&repo)?;

    let mut token = token.to_string();

    if token.is_empty()
        && let Some(url_token) = url_token
    {
        token = url_token;
    }

    if token.is_empty()
        && let Some(env_token) = env("GITHUB_TOKEN")
    {
        token = env_token;
    }

    if token.is_empty() {
        return Err(ChangelingError::InvalidArgs(
            "must set --token or GITHUB_TOKEN".into(),
        ));
    }

    let mut api_url = api_url.to_string();

    if api_url.is_empty()
        && let Some(env_api_url) = env("GITHUB_API_URL")
    {
        api_url = env_api_url;
    }

    if api_url.is_empty() {
        api_url = if host == DEFAULT_HOST {
            DEFAULT_API_URL.to_string()
        } else {
            format!("{scheme}://{host}/api/v3")
        };
    }

    Ok(RemoteConfig {
        host,
        scheme,
        owner,
        repo: name,
        api_url,
        token: SecretString::from(token),
    })
}

type ParsedRepo = (String, String, String, String, Option<String>);

/// Split `owner/name` shorthand or a repository URL into scheme, host,
/// owner, name and an optional embedded token.
fn parse_repo(repo: &str) -> Result<ParsedRepo> {
    if let Some(caps) = REPO_SHORTHAND_REGEX.captures(repo) {
        return Ok((
            "https".into(),
            DEFAULT_HOST.into(),
            caps["owner"].to_string(),
            caps["repo"].trim_end_matches(".git").to_string(),
            None,
        ));
    }

    let parsed = GitUrl::parse(repo)?;

    let scheme = match parsed.scheme {
        git_url_parse::Scheme::Http => "http",
        git_url_parse::Scheme::Https => "https",
        _ => {
            return Err(ChangelingError::InvalidRemoteUrl(format!(
                "only http and https schemes are supported for repo urls: {repo}"
            )));
        }
    };

    let host = parsed.host.ok_or_else(|| {
        ChangelingError::InvalidRemoteUrl(format!(
            "unable to parse host from github repo: {repo}"
        ))
    })?;

    let owner = parsed.owner.ok_or_else(|| {
        ChangelingError::InvalidRemoteUrl(format!(
            "unable to parse owner from github repo: {repo}"
        ))
    })?;

    Ok((scheme.into(), host, owner, parsed.name, parsed.token))
}
