//! Pending changelog fragments, one file per pull request.
use log::*;
use regex::Regex;
use std::{
    path::{Component, Path, PathBuf},
    sync::LazyLock,
};

use crate::{ChangelingError, Result};

static FRAGMENT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^pr-([0-9]+)(?:\.[a-z]+)?$").unwrap());

static SNIPPET_CANDIDATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*[-_].*\.md$").unwrap());

/// Extensions of files considered when scanning the fragment directory.
const FRAGMENT_EXTENSIONS: [&str; 2] = ["md", "rst"];

/// A fragment file found in the fragment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub path: PathBuf,
    pub pr_number: u64,
}

/// Extract the pull request number from a fragment file name such as
/// `pr-42.md`.
pub fn parse_fragment_name(name: &str) -> Result<u64> {
    let caps = FRAGMENT_NAME_REGEX
        .captures(name)
        .ok_or_else(|| ChangelingError::InvalidFragmentName(name.to_string()))?;

    caps[1].parse::<u64>().map_err(|_| {
        ChangelingError::FragmentNumberOutOfRange(name.to_string())
    })
}

/// File name of the fragment for `pr_number`.
pub fn fragment_file_name(pr_number: u64) -> String {
    format!("pr-{pr_number}.md")
}

pub fn fragment_path(dir: &Path, pr_number: u64) -> PathBuf {
    dir.join(fragment_file_name(pr_number))
}

/// Drop `.` components so `./changelog.d` and `changelog.d` compare equal.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Whether `path`, relative to the repository root, looks like a
/// hand-written changelog snippet placed directly in `dir`.
pub fn is_snippet_candidate(path: &Path, dir: &Path) -> bool {
    let path = normalize_path(path);
    if path.parent() != Some(normalize_path(dir).as_path()) {
        return false;
    }

    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| SNIPPET_CANDIDATE_REGEX.is_match(name))
}

/// List the fragments in `dir` in file-name order. Markdown and
/// reStructuredText files whose names do not encode a pull request number are
/// skipped with a warning.
pub async fn scan_fragments(dir: &Path) -> Result<Vec<Fragment>> {
    let mut paths: Vec<PathBuf> = vec![];

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let path = entry.path();
        let has_fragment_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FRAGMENT_EXTENSIONS.contains(&ext));

        if has_fragment_extension {
            paths.push(path);
        }
    }

    paths.sort();

    let mut fragments = vec![];

    for path in paths {
        info!("processing snippet {}", path.display());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match parse_fragment_name(&name) {
            Ok(pr_number) => fragments.push(Fragment { path, pr_number }),
            Err(err) => warn!("{err}: {}", path.display()),
        }
    }

    Ok(fragments)
}
