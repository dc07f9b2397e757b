//! Decides what `add-changelog-snippet` does with the files a pull request
//! adds.
use std::path::{Path, PathBuf};

use crate::{
    ChangelingError, Result,
    changelog::fragment::{fragment_path, is_snippet_candidate, normalize_path},
};

/// What to do about a pull request's changelog snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetAction {
    /// No snippet was added; render one at `path`.
    Generate { path: PathBuf },
    /// The pull request already adds its correctly named snippet.
    AlreadyPresent { path: PathBuf },
    /// The pull request adds one snippet under another name.
    Rename { from: PathBuf, to: PathBuf },
}

/// Inspect the files added by pull request `pr_number` and decide how its
/// snippet in `fragment_dir` should be produced.
pub fn decide_snippet_action(
    added_files: &[String],
    fragment_dir: &Path,
    pr_number: u64,
) -> Result<SnippetAction> {
    let fragment_dir = normalize_path(fragment_dir);
    let expected = fragment_path(&fragment_dir, pr_number);

    let candidates: Vec<PathBuf> = added_files
        .iter()
        .map(|file| normalize_path(Path::new(file)))
        .filter(|path| is_snippet_candidate(path, &fragment_dir))
        .collect();

    if candidates.is_empty() {
        return Ok(SnippetAction::Generate { path: expected });
    }

    if candidates.contains(&expected) {
        return Ok(SnippetAction::AlreadyPresent { path: expected });
    }

    match candidates.as_slice() {
        [only] => Ok(SnippetAction::Rename {
            from: only.clone(),
            to: expected,
        }),
        _ => Err(ChangelingError::AmbiguousSnippets {
            expected: expected.display().to_string(),
            found: candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect(),
        }),
    }
}
