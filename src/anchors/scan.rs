//! Document scanning
//!
//! Applies the pattern matchers to every eligible line of one document.
//! Markdown lines are always eligible; other kinds need a comment prefix on
//! the trimmed line or membership in a multi-line zone.

use serde::Serialize;
use serde_json::json;

use crate::anchors::kind::{FileKind, SyntaxFamily};
use crate::anchors::syntax::{find_anchors, find_links, Span, SyntaxForm, SyntaxMatch};
use crate::anchors::zones::zone_mask;
use crate::core::file_reader::truncate_at_char_boundary;
use crate::core::model::{Range, ResultItem};

/// Maximum preview length in bytes
pub const MAX_PREVIEW_LEN: usize = 160;

/// A named location declared in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub id: String,
    /// Root-relative path using '/' separators
    pub path: String,
    /// 0-based line number
    pub line: u32,
    /// The whole construct
    pub span: Span,
    /// The label text
    pub selection: Span,
    pub label: String,
    /// Trimmed line without its comment prefix
    pub preview: String,
    pub form: SyntaxForm,
}

impl Anchor {
    pub fn to_result_item(&self) -> ResultItem {
        ResultItem::anchor(
            self.path.clone(),
            Range::columns(self.line + 1, self.span.start, self.span.end),
        )
        .with_excerpt(self.preview.clone())
        .with_data(json!({
            "id": self.id,
            "label": self.label,
            "line": self.line,
            "span": self.span,
            "selection": self.selection,
            "form": self.form,
        }))
    }
}

/// A reference to an anchor id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Target id, without the leading `#`
    pub id: String,
    pub path: String,
    /// 0-based line number
    pub line: u32,
    pub span: Span,
    pub selection: Span,
    pub label: String,
    pub form: SyntaxForm,
}

impl Link {
    /// Clickable region: the whole construct for backlinks, the bracket
    /// text for legacy forms
    pub fn target_span(&self) -> Span {
        match self.form {
            SyntaxForm::Backlink => self.span,
            SyntaxForm::Legacy => self.selection,
        }
    }
}

/// Anchors and links of a single document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedDocument {
    pub anchors: Vec<Anchor>,
    pub links: Vec<Link>,
}

/// Per-line eligibility for a document of the given kind
pub fn eligible_lines<S: AsRef<str>>(lines: &[S], kind: FileKind) -> Vec<bool> {
    if kind.family() == SyntaxFamily::Markdown {
        return vec![true; lines.len()];
    }

    let zones = zone_mask(lines, kind.zone_rule());
    lines
        .iter()
        .zip(zones)
        .map(|(line, in_zone)| in_zone || kind.matching_prefix(line.as_ref().trim()).is_some())
        .collect()
}

/// Scan a document for both anchors and links
pub fn scan_document(path: &str, text: &str, kind: FileKind, legacy: bool) -> ScannedDocument {
    let lines: Vec<&str> = text.lines().collect();
    let eligible = eligible_lines(&lines, kind);
    let family = kind.family();

    let mut doc = ScannedDocument::default();
    for (index, line) in lines.iter().enumerate() {
        if !eligible[index] {
            continue;
        }
        let line_no = index as u32;

        for m in find_anchors(line, family, legacy) {
            doc.anchors.push(make_anchor(path, line_no, line, kind, m));
        }
        for m in find_links(line, family, legacy) {
            doc.links.push(make_link(path, line_no, m));
        }
    }
    doc
}

/// Anchors declared in a document, in line then column order
pub fn scan_anchors(path: &str, text: &str, kind: FileKind, legacy: bool) -> Vec<Anchor> {
    scan_document(path, text, kind, legacy).anchors
}

/// Links in a document, in line then column order
pub fn scan_links(path: &str, text: &str, kind: FileKind, legacy: bool) -> Vec<Link> {
    scan_document(path, text, kind, legacy).links
}

fn make_anchor(path: &str, line_no: u32, line: &str, kind: FileKind, m: SyntaxMatch) -> Anchor {
    Anchor {
        form: m.pattern.form(),
        id: m.id,
        path: path.to_string(),
        line: line_no,
        span: m.span,
        selection: m.selection,
        label: m.label,
        preview: preview(line, kind),
    }
}

fn make_link(path: &str, line_no: u32, m: SyntaxMatch) -> Link {
    Link {
        form: m.pattern.form(),
        id: m.id,
        path: path.to_string(),
        line: line_no,
        span: m.span,
        selection: m.selection,
        label: m.label,
    }
}

/// Trimmed line with any comment prefix removed
fn preview(line: &str, kind: FileKind) -> String {
    let trimmed = line.trim();
    let body = match kind.matching_prefix(trimmed) {
        Some(prefix) => trimmed[prefix.len()..].trim(),
        None => trimmed,
    };
    truncate_at_char_boundary(body, MAX_PREVIEW_LEN).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_comment_anchor() {
        let text = "fn main() {}\n// [[greeting|Hello World]]\nlet s = \"[[not|indexed]]\";\n";
        let anchors = scan_anchors("src/main.rs", text, FileKind::CStyle, false);

        assert_eq!(anchors.len(), 1);
        let a = &anchors[0];
        assert_eq!(a.id, "greeting");
        assert_eq!(a.path, "src/main.rs");
        assert_eq!(a.line, 1);
        assert_eq!(a.label, "Hello World");
        assert_eq!(a.preview, "[[greeting|Hello World]]");
        assert_eq!(a.span, Span::new(3, 27));
        assert_eq!(a.selection, Span::new(14, 25));
    }

    #[test]
    fn test_scan_comment_link() {
        let text = "x = 1  # not a comment line [[#a|b]]\n# [[#greeting|jump here]]\n";
        let links = scan_links("tool.py", text, FileKind::Python, false);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "greeting");
        assert_eq!(links[0].line, 1);
        assert_eq!(links[0].label, "jump here");
    }

    #[test]
    fn test_no_eligible_lines() {
        let text = "let a = \"[[x|y]]\";\nlet b = \"[[#x|y]]\";\n";
        let doc = scan_document("a.ts", text, FileKind::CStyle, true);
        assert!(doc.anchors.is_empty());
        assert!(doc.links.is_empty());
    }

    #[test]
    fn test_markdown_every_line_eligible() {
        let text = "# Title\n\nSee [[setup|Setup]] and [[#intro|the intro]].\n";
        let doc = scan_document("docs/guide.md", text, FileKind::Markdown, false);

        assert_eq!(doc.anchors.len(), 1);
        assert_eq!(doc.anchors[0].id, "setup");
        assert_eq!(doc.anchors[0].line, 2);
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].id, "intro");
    }

    #[test]
    fn test_python_docstring_zone() {
        let text = "def f():\n    \"\"\"\n    [[doc_anchor|Docs]]\n    \"\"\"\n    x = \"[[code|Code]]\"\n";
        let anchors = scan_anchors("m.py", text, FileKind::Python, false);

        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].id, "doc_anchor");
        assert_eq!(anchors[0].line, 2);
    }

    #[test]
    fn test_html_comment_zone() {
        let text = "<div>\n<!--\n  [[block|Block note]]\n-->\n<p>[[outside|Nope]]</p>\n<!-- [[inline|Inline]] -->\n";
        let ids: Vec<_> = scan_anchors("index.html", text, FileKind::Html, false)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["block", "inline"]);
    }

    #[test]
    fn test_legacy_forms_gated_by_flag() {
        let text = "// [Intro](#intro)\n// see [Intro](intro)\n";
        assert!(scan_document("a.js", text, FileKind::CStyle, false)
            .anchors
            .is_empty());

        let doc = scan_document("a.js", text, FileKind::CStyle, true);
        assert_eq!(doc.anchors.len(), 1);
        assert_eq!(doc.anchors[0].form, SyntaxForm::Legacy);
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].target_span(), doc.links[0].selection);
    }

    #[test]
    fn test_backlink_target_span_is_full_match() {
        let links = scan_links("a.md", "[[#x|go]]", FileKind::Markdown, false);
        assert_eq!(links[0].target_span(), Span::new(0, 9));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let text = "// [[a|A]]\n// [[b|B]] [[#a|to a]]\n";
        let first = scan_document("x.rs", text, FileKind::CStyle, false);
        let second = scan_document("x.rs", text, FileKind::CStyle, false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_truncated() {
        let long = format!("// [[id|label]] {}", "é".repeat(200));
        let anchors = scan_anchors("a.rs", &long, FileKind::CStyle, false);
        assert!(anchors[0].preview.len() <= MAX_PREVIEW_LEN);
        assert!(anchors[0].preview.starts_with("[[id|label]]"));
    }

    #[test]
    fn test_crlf_lines() {
        let text = "// [[a|A]]\r\n// [[b|B]]\r\n";
        let anchors = scan_anchors("a.rs", text, FileKind::CStyle, false);
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[1].line, 1);
    }

    #[test]
    fn test_anchor_result_item() {
        let anchors = scan_anchors("src/main.rs", "\n\n\n// [[greeting|Hi]]", FileKind::CStyle, false);
        let item = anchors[0].to_result_item();
        assert_eq!(item.path.as_deref(), Some("src/main.rs"));
        assert_eq!(item.range, Some(Range::columns(4, 3, 18)));
        assert_eq!(item.data.unwrap()["id"], "greeting");
    }
}
