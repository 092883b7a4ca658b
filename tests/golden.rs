//! Golden tests for anchorlink
//!
//! These tests run the binary against tests/fixtures/sample_project and pin
//! the output structure:
//! - Stable file and anchor ordering
//! - Comment, docstring and HTML-comment eligibility
//! - Ignore-file exclusions

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get the path to the sample project
fn sample_project() -> PathBuf {
    fixtures_dir().join("sample_project")
}

/// Create a command rooted at the sample project
fn anchorlink_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("anchorlink"));
    cmd.env_remove("ANCHORLINK_LEGACY_SYNTAX")
        .env_remove("ANCHORLINK_USE_GITIGNORE")
        .env_remove("ANCHORLINK_FILE_TYPES")
        .arg("--root")
        .arg(sample_project());
    cmd
}

/// Parse JSONL output into a vector of JSON values
fn parse_jsonl(output: &str) -> Vec<Value> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<Value>(l).ok())
        .collect()
}

fn run_jsonl(args: &[&str]) -> Vec<Value> {
    let output = anchorlink_cmd().args(args).output().expect("failed to execute");
    assert!(output.status.success(), "command failed: {args:?}");
    parse_jsonl(&String::from_utf8_lossy(&output.stdout))
}

fn str_field<'a>(item: &'a Value, pointer: &str) -> &'a str {
    item.pointer(pointer).and_then(|v| v.as_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Files ====================

    #[test]
    fn golden_files_structure() {
        let items = run_jsonl(&["files"]);

        let paths: Vec<&str> = items.iter().map(|v| str_field(v, "/path")).collect();
        assert_eq!(
            paths,
            vec![
                "README.md",
                "docs/guide.md",
                "src/main.rs",
                "src/util.py",
                "web/index.html"
            ],
            "generated/ is excluded by .anchorlinkignore"
        );

        for item in &items {
            assert_eq!(str_field(item, "/kind"), "file");
            assert_eq!(str_field(item, "/confidence"), "high");
            assert_eq!(str_field(item, "/source_mode"), "scan");
            assert!(item.get("meta").is_some(), "meta field must exist");
        }
        assert_eq!(str_field(&items[2], "/data/kind"), "c");
    }

    // ==================== Anchors ====================

    #[test]
    fn golden_anchor_list_structure() {
        let items = run_jsonl(&["anchor", "list"]);

        let ids: Vec<&str> = items.iter().map(|v| str_field(v, "/data/id")).collect();
        assert_eq!(
            ids,
            vec!["greeting", "greeting", "layout", "main_entry", "overview", "setup", "utils"]
        );

        for item in &items {
            assert_eq!(str_field(item, "/kind"), "anchor");
            assert_eq!(str_field(item, "/source_mode"), "index");
            assert!(item.get("range").is_some(), "range required for anchors");
            assert!(item.get("excerpt").is_some(), "excerpt required for anchors");
        }
    }

    #[test]
    fn golden_anchor_list_by_file() {
        let items = run_jsonl(&["anchor", "list", "--by-file"]);

        let counts: Vec<(&str, u64)> = items
            .iter()
            .map(|v| {
                (
                    str_field(v, "/path"),
                    v.pointer("/meta/anchors").and_then(|c| c.as_u64()).unwrap_or(0),
                )
            })
            .collect();
        assert_eq!(
            counts,
            vec![
                ("README.md", 1),
                ("docs/guide.md", 1),
                ("src/main.rs", 2),
                ("src/util.py", 2),
                ("web/index.html", 1),
            ]
        );
    }

    #[test]
    fn golden_anchor_get_first_definition() {
        let items = run_jsonl(&["anchor", "get", "greeting"]);
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(str_field(item, "/path"), "src/main.rs");
        assert_eq!(item.pointer("/range/line").and_then(|v| v.as_u64()), Some(5));
        assert_eq!(item.pointer("/range/start").and_then(|v| v.as_u64()), Some(7));
        assert_eq!(item.pointer("/range/end").and_then(|v| v.as_u64()), Some(31));
        assert_eq!(str_field(item, "/excerpt"), "[[greeting|Hello World]]");
        assert_eq!(str_field(item, "/data/label"), "Hello World");
        assert_eq!(
            item.pointer("/data/definitions").and_then(|v| v.as_u64()),
            Some(2)
        );
    }

    #[test]
    fn golden_anchor_in_docstring_and_html_comment() {
        let utils = run_jsonl(&["anchor", "get", "utils"]);
        assert_eq!(str_field(&utils[0], "/path"), "src/util.py");

        let layout = run_jsonl(&["anchor", "get", "layout"]);
        assert_eq!(str_field(&layout[0], "/path"), "web/index.html");

        for id in ["not_an_anchor", "plain_string", "body_text", "generated"] {
            assert!(run_jsonl(&["anchor", "get", id]).is_empty(), "{id} must not be indexed");
        }
    }

    #[test]
    fn golden_anchor_lint_duplicates() {
        let items = run_jsonl(&["anchor", "lint"]);
        assert_eq!(items.len(), 2);

        let paths: Vec<&str> = items.iter().map(|v| str_field(v, "/path")).collect();
        assert_eq!(paths, vec!["src/main.rs", "src/util.py"]);
        for item in &items {
            assert_eq!(str_field(item, "/kind"), "error");
            assert_eq!(str_field(item, "/errors/0/code"), "DUPLICATE_ID");
        }
    }

    // ==================== Links ====================

    #[test]
    fn golden_links_resolve_across_files() {
        let items = run_jsonl(&["links", "README.md"]);
        assert_eq!(items.len(), 1, "dead links are omitted");

        let item = &items[0];
        assert_eq!(str_field(item, "/kind"), "link");
        assert_eq!(str_field(item, "/data/id"), "setup");
        assert_eq!(str_field(item, "/data/target/path"), "docs/guide.md");
        assert_eq!(
            item.pointer("/data/target/line").and_then(|v| v.as_u64()),
            Some(5)
        );
        assert_eq!(str_field(item, "/excerpt"), "the setup guide");
    }

    // ==================== Formats ====================

    #[test]
    fn golden_markdown_output() {
        let output = anchorlink_cmd()
            .args(["--format", "md", "anchor", "get", "overview"])
            .output()
            .expect("failed to execute");
        let stdout = String::from_utf8_lossy(&output.stdout);

        assert!(stdout.contains("## Anchors"));
        assert!(stdout.contains("**overview** `README.md`:3 (cols 0-29)"));
    }
}
