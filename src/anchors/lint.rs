//! Anchor linting module
//!
//! Reports every definition of an id that is defined more than once.

use anyhow::Result;

use crate::anchors::api::build_index;
use crate::anchors::index::AnchorIndex;
use crate::core::config::Settings;
use crate::core::model::{LinkError, Range, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::engine::duplicates::find_duplicates;

/// Error code for repeated anchor ids
pub const DUPLICATE_ID: &str = "DUPLICATE_ID";

/// A lint issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub code: String,
    pub message: String,
    pub path: String,
    /// 1-indexed line
    pub line: u32,
}

impl LintIssue {
    pub fn error(code: &str, message: String, path: &str, line: u32) -> Self {
        Self {
            code: code.to_string(),
            message,
            path: path.to_string(),
            line,
        }
    }

    pub fn to_result_item(&self) -> ResultItem {
        let mut item = ResultItem::error(LinkError::new(&self.code, &self.message));
        item.path = Some(self.path.clone());
        item.range = Some(Range::lines(self.line, self.line));
        item.with_excerpt(self.message.clone())
    }
}

/// One issue per occurrence of each duplicated id, in id then scan order
pub fn lint_index(index: &AnchorIndex) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for duplicate in find_duplicates(index.anchors()) {
        for anchor in index.find_all(&duplicate.id) {
            issues.push(LintIssue::error(
                DUPLICATE_ID,
                format!(
                    "Anchor id '{}' is defined {} times",
                    duplicate.id, duplicate.count
                ),
                &anchor.path,
                anchor.line + 1,
            ));
        }
    }

    issues
}

/// Lint all anchors in the workspace
pub fn lint_anchors(settings: &Settings) -> Result<Vec<LintIssue>> {
    Ok(lint_index(&build_index(settings)?))
}

/// Run anchor lint command
pub fn run_lint(settings: &Settings, config: RenderConfig) -> Result<()> {
    let issues = lint_anchors(settings)?;

    let result_set: ResultSet = issues.iter().map(LintIssue::to_result_item).collect();

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::index::tests::anchor;
    use crate::core::model::Kind;

    #[test]
    fn test_lint_reports_each_occurrence() {
        let mut index = AnchorIndex::new();
        index.replace(vec![
            anchor("dup", "a.rs", 0),
            anchor("dup", "b.rs", 4),
            anchor("ok", "a.rs", 2),
        ]);

        let issues = lint_index(&index);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "a.rs");
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[1].path, "b.rs");
        assert_eq!(issues[1].line, 5);
        assert!(issues.iter().all(|i| i.code == DUPLICATE_ID));
        assert!(issues[0].message.contains("defined 2 times"));
    }

    #[test]
    fn test_clean_index_has_no_issues() {
        let mut index = AnchorIndex::new();
        index.replace(vec![anchor("a", "a.rs", 0), anchor("b", "a.rs", 1)]);
        assert!(lint_index(&index).is_empty());
    }

    #[test]
    fn test_issue_result_item() {
        let issue = LintIssue::error(DUPLICATE_ID, "dup".to_string(), "a.rs", 3);
        let item = issue.to_result_item();
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.path.as_deref(), Some("a.rs"));
        assert_eq!(item.range, Some(Range::lines(3, 3)));
        assert_eq!(item.errors[0].code, DUPLICATE_ID);
    }
}
