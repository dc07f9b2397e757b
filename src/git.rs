//! Local git repository operations.
//!
//! Lists release tags reachable from `HEAD` and stages and commits changelog
//! snippets in the working tree the tool is run from.
#[cfg(test)]
use mockall::automock;
use log::*;
use std::path::{Path, PathBuf};

use crate::{ChangelingError, Result};

/// Git operations needed by the release and snippet commands. Paths are
/// relative to the repository working directory.
#[cfg_attr(test, automock)]
pub trait GitRepository {
    /// Root of the working tree.
    fn workdir(&self) -> PathBuf;
    /// Names of every tag whose target commit is `HEAD` or an ancestor of it.
    fn tags_merged_into_head(&self) -> Result<Vec<String>>;
    /// Stage a file.
    fn add(&self, path: &Path) -> Result<()>;
    /// Rename a tracked file and stage the rename.
    fn mv(&self, from: &Path, to: &Path) -> Result<()>;
    /// Commit the index onto `HEAD`.
    fn commit(&self, msg: &str) -> Result<()>;
}

/// [`GitRepository`] backed by a repository on disk.
pub struct LocalRepository {
    repo: git2::Repository,
}

impl LocalRepository {
    /// Open the repository containing `path`, searching parent directories.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        debug!(
            "opened git repository at {}",
            repo.workdir().unwrap_or(repo.path()).display()
        );
        Ok(Self { repo })
    }

    fn bare_error(&self) -> ChangelingError {
        ChangelingError::GitError(git2::Error::from_str(&format!(
            "repository at {} has no working directory",
            self.repo.path().display()
        )))
    }
}

impl GitRepository for LocalRepository {
    fn workdir(&self) -> PathBuf {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.repo.path().to_path_buf())
    }

    fn tags_merged_into_head(&self) -> Result<Vec<String>> {
        let head = self.repo.head()?.peel_to_commit()?.id();
        let mut merged = vec![];

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference =
                self.repo.find_reference(&format!("refs/tags/{name}"))?;

            // tags pointing at trees or blobs can never be merged
            let Ok(commit) = reference.peel_to_commit() else {
                debug!("skipping tag {name}: does not point at a commit");
                continue;
            };

            if commit.id() == head
                || self.repo.graph_descendant_of(head, commit.id())?
            {
                merged.push(name.to_string());
            }
        }

        debug!("found {} tags merged into HEAD", merged.len());

        Ok(merged)
    }

    fn add(&self, path: &Path) -> Result<()> {
        debug!("adding {} to index", path.display());
        let mut index = self.repo.index()?;
        index.add_path(path)?;
        index.write()?;
        Ok(())
    }

    fn mv(&self, from: &Path, to: &Path) -> Result<()> {
        debug!("moving {} to {}", from.display(), to.display());
        let workdir = self.repo.workdir().ok_or_else(|| self.bare_error())?;
        std::fs::rename(workdir.join(from), workdir.join(to))?;
        let mut index = self.repo.index()?;
        index.remove_path(from)?;
        index.add_path(to)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, msg: &str) -> Result<()> {
        debug!("committing changes with msg: {msg}");
        let config = self.repo.config()?.snapshot()?;
        let user = config.get_str("user.name")?;
        let email = config.get_str("user.email")?;
        debug!("using committer: user: {user}, email: {email}");
        let mut index = self.repo.index()?;
        let oid = index.write_tree()?;
        let tree = self.repo.find_tree(oid)?;
        let committer = git2::Signature::now(user, email)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(err) if err.code() == git2::ErrorCode::UnbornBranch => None,
            Err(err) => return Err(err.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo.commit(
            Some("HEAD"),
            &committer,
            &committer,
            msg,
            &tree,
            &parents,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, LocalRepository) {
        let tmp = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        (tmp, LocalRepository { repo })
    }

    fn commit_file(
        tmp: &TempDir,
        repo: &LocalRepository,
        name: &str,
    ) -> git2::Oid {
        std::fs::write(tmp.path().join(name), name).unwrap();
        repo.add(Path::new(name)).unwrap();
        repo.commit(&format!("add {name}")).unwrap();
        repo.repo.head().unwrap().peel_to_commit().unwrap().id()
    }

    fn head_message(repo: &LocalRepository) -> String {
        repo.repo
            .head()
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .message()
            .unwrap()
            .to_string()
    }

    #[test]
    fn lists_only_tags_merged_into_head() {
        let (tmp, repo) = init_repo();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();

        let first = commit_file(&tmp, &repo, "a.txt");
        let first_obj = repo.repo.find_object(first, None).unwrap();
        repo.repo.tag_lightweight("v0.1.0", &first_obj, false).unwrap();

        let second = commit_file(&tmp, &repo, "b.txt");
        let second_obj = repo.repo.find_object(second, None).unwrap();
        repo.repo
            .tag("v0.2.0", &second_obj, &sig, "release 0.2.0", false)
            .unwrap();

        // commit on a side line that HEAD does not contain
        let head_commit = repo.repo.find_commit(second).unwrap();
        let tree = head_commit.tree().unwrap();
        let side = repo
            .repo
            .commit(None, &sig, &sig, "side", &tree, &[&head_commit])
            .unwrap();
        let side_obj = repo.repo.find_object(side, None).unwrap();
        repo.repo.tag_lightweight("v9.9.9", &side_obj, false).unwrap();

        let mut tags = repo.tags_merged_into_head().unwrap();
        tags.sort();
        assert_eq!(tags, vec!["v0.1.0".to_string(), "v0.2.0".to_string()]);
    }

    #[test]
    fn adds_and_commits_on_unborn_branch() {
        let (tmp, repo) = init_repo();
        std::fs::create_dir(tmp.path().join("changelog.d")).unwrap();
        std::fs::write(tmp.path().join("changelog.d/pr-1.md"), "x").unwrap();

        repo.add(Path::new("changelog.d/pr-1.md")).unwrap();
        repo.commit("first").unwrap();

        assert_eq!(head_message(&repo), "first");
        let head_tree = repo.repo.head().unwrap().peel_to_tree().unwrap();
        assert!(
            head_tree
                .get_path(Path::new("changelog.d/pr-1.md"))
                .is_ok()
        );
    }

    #[test]
    fn moves_tracked_files() {
        let (tmp, repo) = init_repo();
        std::fs::create_dir(tmp.path().join("changelog.d")).unwrap();
        commit_file(&tmp, &repo, "changelog.d/2024_sorting.md");

        repo.mv(
            Path::new("changelog.d/2024_sorting.md"),
            Path::new("changelog.d/pr-5.md"),
        )
        .unwrap();
        repo.commit("rename").unwrap();

        assert!(!tmp.path().join("changelog.d/2024_sorting.md").exists());
        assert!(tmp.path().join("changelog.d/pr-5.md").exists());

        let head_tree = repo.repo.head().unwrap().peel_to_tree().unwrap();
        assert!(head_tree.get_path(Path::new("changelog.d/pr-5.md")).is_ok());
        assert!(
            head_tree
                .get_path(Path::new("changelog.d/2024_sorting.md"))
                .is_err()
        );
    }

    #[test]
    fn workdir_is_repository_root() {
        let (tmp, repo) = init_repo();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        let found = LocalRepository::discover(&tmp.path().join("nested")).unwrap();
        assert_eq!(
            found.workdir().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
        drop(repo);
    }
}
