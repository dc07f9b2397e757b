//! Renders one pull request as a markdown changelog entry.
use crate::{
    ChangelingError, Result, config::CategoryRule, forge::request::PullRequest,
};

const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];

/// Render `pr` as a single list entry under its category heading.
///
/// Fails with [`ChangelingError::CategoryUnresolved`] when none of the pull
/// request's labels belongs to a configured category.
pub fn render(pr: &PullRequest, rules: &[CategoryRule]) -> Result<String> {
    let category = pr.category(rules).ok_or(ChangelingError::CategoryUnresolved {
        pr_number: pr.number,
    })?;

    let mut title = pr.title.trim().to_string();
    if !title.ends_with(SENTENCE_ENDINGS) {
        title.push('.');
    }

    let fixes = if pr.closed_issues.is_empty() {
        "".to_string()
    } else {
        let links = pr
            .closed_issues
            .iter()
            .map(|issue| issue.as_link())
            .collect::<Vec<String>>()
            .join(", ");
        format!("Fixes {links} via ")
    };

    Ok(format!(
        "### {}\n\n- {title}  {fixes}{} (by {})\n",
        category.name,
        pr.as_link(),
        pr.author.as_link()
    ))
}
