//! Tests for the add-changelog-snippet workflow.

use mockall::predicate::eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::common::*;
use crate::{ChangelingError, orchestrator::snippet_action::SnippetAction};

#[test_log::test(tokio::test)]
async fn generates_and_commits_missing_snippet() {
    let tmp = TempDir::new().unwrap();

    let mut forge = mock_forge();
    forge
        .expect_get_pr_added_files()
        .with(eq(7))
        .times(1)
        .returning(|_| Ok(vec!["src/lib.rs".into()]));
    forge.expect_get_pr_info_page().times(1).returning(|_| {
        let mut pr = pull_request(7, &["patch"], &[]);
        pr.title = "Fix bug".into();
        Ok(single_page(&pr))
    });

    let mut repo = mock_repo(tmp.path().to_path_buf());
    repo.expect_add()
        .withf(|path| path == Path::new("changelog.d/pr-7.md"))
        .times(1)
        .returning(|_| Ok(()));
    repo.expect_commit()
        .withf(|msg| {
            msg == "[changeling] Autogenerate changelog snippet for PR 7"
        })
        .times(1)
        .returning(|_| Ok(()));

    let orchestrator =
        create_test_orchestrator(forge, repo, test_config(), false);
    let action = orchestrator.add_changelog_snippet(7).await.unwrap();

    assert_eq!(
        action,
        SnippetAction::Generate {
            path: PathBuf::from("changelog.d/pr-7.md")
        }
    );
    let written =
        std::fs::read_to_string(tmp.path().join("changelog.d/pr-7.md")).unwrap();
    assert_eq!(
        written,
        "### 🐛 Bug Fixes\n\n- Fix bug.  [PR #7](https://github.com/octo/widgets/pull/7) (by [@alice](https://github.com/alice))\n"
    );
}

#[tokio::test]
async fn unlabeled_pull_request_fails_without_writing() {
    let tmp = TempDir::new().unwrap();

    let mut forge = mock_forge();
    forge
        .expect_get_pr_added_files()
        .returning(|_| Ok(vec![]));
    forge
        .expect_get_pr_info_page()
        .returning(|_| Ok(single_page(&pull_request(7, &["docs"], &[]))));

    let mut repo = mock_repo(tmp.path().to_path_buf());
    repo.expect_add().never();
    repo.expect_commit().never();

    let orchestrator =
        create_test_orchestrator(forge, repo, test_config(), false);
    let err = orchestrator.add_changelog_snippet(7).await.unwrap_err();

    assert!(matches!(
        err,
        ChangelingError::CategoryUnresolved { pr_number: 7 }
    ));
    assert!(!tmp.path().join("changelog.d").exists());
}

#[tokio::test]
async fn leaves_existing_snippet_alone() {
    let tmp = TempDir::new().unwrap();

    let mut forge = mock_forge();
    forge
        .expect_get_pr_added_files()
        .returning(|_| Ok(vec!["changelog.d/pr-7.md".into()]));
    forge.expect_get_pr_info_page().never();

    let mut repo = mock_repo(tmp.path().to_path_buf());
    repo.expect_mv().never();
    repo.expect_commit().never();

    let orchestrator =
        create_test_orchestrator(forge, repo, test_config(), false);
    let action = orchestrator.add_changelog_snippet(7).await.unwrap();

    assert!(matches!(action, SnippetAction::AlreadyPresent { .. }));
}

#[tokio::test]
async fn keeps_existing_snippet_with_dot_prefixed_directory() {
    let tmp = TempDir::new().unwrap();

    let mut forge = mock_forge();
    forge
        .expect_get_pr_added_files()
        .returning(|_| Ok(vec!["changelog.d/pr-7.md".into()]));
    forge.expect_get_pr_info_page().never();

    let mut repo = mock_repo(tmp.path().to_path_buf());
    repo.expect_add().never();
    repo.expect_commit().never();

    let mut config = test_config();
    config.fragment_directory = PathBuf::from("./changelog.d");

    let orchestrator = create_test_orchestrator(forge, repo, config, false);
    let action = orchestrator.add_changelog_snippet(7).await.unwrap();

    assert!(matches!(action, SnippetAction::AlreadyPresent { .. }));
    assert!(!tmp.path().join("changelog.d/pr-7.md").exists());
}

#[tokio::test]
async fn renames_single_added_snippet() {
    let tmp = TempDir::new().unwrap();

    let mut forge = mock_forge();
    forge.expect_get_pr_added_files().returning(|_| {
        Ok(vec!["changelog.d/20240101_alice_sorting.md".into()])
    });
    forge.expect_get_pr_info_page().never();

    let mut repo = mock_repo(tmp.path().to_path_buf());
    repo.expect_mv()
        .withf(|from, to| {
            from == Path::new("changelog.d/20240101_alice_sorting.md")
                && to == Path::new("changelog.d/pr-7.md")
        })
        .times(1)
        .returning(|_, _| Ok(()));
    repo.expect_commit()
        .withf(|msg| msg == "[changeling] Rename changelog snippet for PR 7")
        .times(1)
        .returning(|_| Ok(()));

    let orchestrator =
        create_test_orchestrator(forge, repo, test_config(), false);
    orchestrator.add_changelog_snippet(7).await.unwrap();
}

#[tokio::test]
async fn dry_run_generates_nothing_on_disk() {
    let tmp = TempDir::new().unwrap();

    let mut forge = mock_forge();
    forge.expect_get_pr_added_files().returning(|_| Ok(vec![]));
    forge
        .expect_get_pr_info_page()
        .returning(|_| Ok(single_page(&pull_request(7, &["minor"], &[]))));

    let mut repo = mock_repo(tmp.path().to_path_buf());
    repo.expect_add().never();
    repo.expect_commit().never();

    let orchestrator =
        create_test_orchestrator(forge, repo, test_config(), true);
    orchestrator.add_changelog_snippet(7).await.unwrap();

    assert!(!tmp.path().join("changelog.d/pr-7.md").exists());
}
