//! Pattern matching
//!
//! Pure per-line matchers for anchor definitions and link references:
//!
//! - backlink anchor: `[[id|label]]`
//! - backlink link: `[[#id|label]]`
//! - legacy comment forms: `[text](#id)` (anchor), `[text](id)` (link)
//! - legacy markdown forms: `[text](<>#id)` (anchor), `[text](<>id)` (link)
//!
//! Spans are byte offsets into the line, so `span.slice(line)` returns the
//! matched text exactly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::anchors::kind::SyntaxFamily;

/// Static regex for backlink anchor definitions
/// Format: [[id|label]]
pub static BACKLINK_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([A-Za-z0-9_-]+)\|([^\]]+)\]\]").expect("Invalid BACKLINK_ANCHOR_RE regex")
});

/// Static regex for backlink link references
/// Format: [[#id|label]]
pub static BACKLINK_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[#([A-Za-z0-9_-]+)\|([^\]]+)\]\]").expect("Invalid BACKLINK_LINK_RE regex")
});

/// Format: [text](#id)
pub static LEGACY_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\(#([A-Za-z0-9_-]+)\)").expect("Invalid LEGACY_ANCHOR_RE regex")
});

/// Format: [text](id)
pub static LEGACY_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([A-Za-z0-9_-]+)\)").expect("Invalid LEGACY_LINK_RE regex")
});

/// Format: [text](<>#id)
pub static MARKDOWN_LEGACY_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\(<>#([A-Za-z0-9_-]+)\)")
        .expect("Invalid MARKDOWN_LEGACY_ANCHOR_RE regex")
});

/// Format: [text](<>id)
pub static MARKDOWN_LEGACY_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\(<>([A-Za-z0-9_-]+)\)")
        .expect("Invalid MARKDOWN_LEGACY_LINK_RE regex")
});

/// Half-open byte range within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Text covered by this span; empty if the span does not fit the line
    #[allow(dead_code)]
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.start..self.end).unwrap_or("")
    }

    /// Whether a column lies inside the span (end inclusive, for cursor tests)
    #[allow(dead_code)]
    pub fn touches(&self, column: usize) -> bool {
        column >= self.start && column <= self.end
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Syntax generation a match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxForm {
    Backlink,
    Legacy,
}

/// One matcher variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    BacklinkAnchor,
    BacklinkLink,
    LegacyAnchor,
    LegacyLink,
    MarkdownLegacyAnchor,
    MarkdownLegacyLink,
}

const COMMENT_ANCHORS: &[Pattern] = &[Pattern::BacklinkAnchor];
const COMMENT_ANCHORS_LEGACY: &[Pattern] = &[Pattern::BacklinkAnchor, Pattern::LegacyAnchor];
const MARKDOWN_ANCHORS_LEGACY: &[Pattern] =
    &[Pattern::BacklinkAnchor, Pattern::MarkdownLegacyAnchor];

const COMMENT_LINKS: &[Pattern] = &[Pattern::BacklinkLink];
const COMMENT_LINKS_LEGACY: &[Pattern] = &[Pattern::BacklinkLink, Pattern::LegacyLink];
const MARKDOWN_LINKS_LEGACY: &[Pattern] = &[Pattern::BacklinkLink, Pattern::MarkdownLegacyLink];

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Pattern::BacklinkAnchor => &BACKLINK_ANCHOR_RE,
            Pattern::BacklinkLink => &BACKLINK_LINK_RE,
            Pattern::LegacyAnchor => &LEGACY_ANCHOR_RE,
            Pattern::LegacyLink => &LEGACY_LINK_RE,
            Pattern::MarkdownLegacyAnchor => &MARKDOWN_LEGACY_ANCHOR_RE,
            Pattern::MarkdownLegacyLink => &MARKDOWN_LEGACY_LINK_RE,
        }
    }

    pub fn form(self) -> SyntaxForm {
        match self {
            Pattern::BacklinkAnchor | Pattern::BacklinkLink => SyntaxForm::Backlink,
            _ => SyntaxForm::Legacy,
        }
    }

    /// Anchor-definition variants for a family
    pub fn anchors(family: SyntaxFamily, legacy: bool) -> &'static [Pattern] {
        match (family, legacy) {
            (_, false) => COMMENT_ANCHORS,
            (SyntaxFamily::Comment, true) => COMMENT_ANCHORS_LEGACY,
            (SyntaxFamily::Markdown, true) => MARKDOWN_ANCHORS_LEGACY,
        }
    }

    /// Link-reference variants for a family
    pub fn links(family: SyntaxFamily, legacy: bool) -> &'static [Pattern] {
        match (family, legacy) {
            (_, false) => COMMENT_LINKS,
            (SyntaxFamily::Comment, true) => COMMENT_LINKS_LEGACY,
            (SyntaxFamily::Markdown, true) => MARKDOWN_LINKS_LEGACY,
        }
    }

    /// All non-overlapping occurrences of this pattern in a line
    pub fn find_iter(self, line: &str) -> Vec<SyntaxMatch> {
        self.regex()
            .captures_iter(line)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                // backlinks capture (id, label); legacy forms capture (text, id)
                let (id, label) = match self.form() {
                    SyntaxForm::Backlink => (caps.get(1)?, caps.get(2)?),
                    SyntaxForm::Legacy => (caps.get(2)?, caps.get(1)?),
                };
                Some(SyntaxMatch {
                    pattern: self,
                    id: id.as_str().to_string(),
                    label: label.as_str().to_string(),
                    span: Span::new(full.start(), full.end()),
                    selection: Span::new(label.start(), label.end()),
                })
            })
            .collect()
    }
}

/// A single occurrence of an anchor or link construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxMatch {
    pub pattern: Pattern,
    /// Lookup key (never includes the leading `#`)
    pub id: String,
    /// Display text: the backlink label or the legacy bracket text
    pub label: String,
    /// The whole construct
    pub span: Span,
    /// Human-meaningful sub-span (equals the label's position)
    pub selection: Span,
}

/// Run every pattern over a line, ordered by column
pub fn find_matches(line: &str, patterns: &[Pattern]) -> Vec<SyntaxMatch> {
    let mut matches: Vec<SyntaxMatch> = patterns.iter().flat_map(|p| p.find_iter(line)).collect();
    matches.sort_by_key(|m| (m.span.start, m.span.end));
    matches
}

/// Anchor definitions in a line
pub fn find_anchors(line: &str, family: SyntaxFamily, legacy: bool) -> Vec<SyntaxMatch> {
    find_matches(line, Pattern::anchors(family, legacy))
}

/// Link references in a line
pub fn find_links(line: &str, family: SyntaxFamily, legacy: bool) -> Vec<SyntaxMatch> {
    find_matches(line, Pattern::links(family, legacy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backlink_anchor() {
        let line = "// [[greeting|Hello World]]";
        let found = find_anchors(line, SyntaxFamily::Comment, false);

        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.id, "greeting");
        assert_eq!(m.label, "Hello World");
        assert_eq!(m.span, Span::new(3, 27));
        assert_eq!(m.span.slice(line), "[[greeting|Hello World]]");
        assert_eq!(m.selection.slice(line), "Hello World");
        assert_eq!(m.pattern.form(), SyntaxForm::Backlink);
    }

    #[test]
    fn test_backlink_link_strips_hash() {
        let line = "// [[#greeting|jump here]]";
        let found = find_links(line, SyntaxFamily::Comment, false);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "greeting");
        assert_eq!(found[0].selection.slice(line), "jump here");
        assert_eq!(found[0].span.slice(line), "[[#greeting|jump here]]");
    }

    #[test]
    fn test_anchor_and_link_do_not_cross_match() {
        let line = "[[a|one]] [[#b|two]]";
        let anchors = find_anchors(line, SyntaxFamily::Markdown, false);
        let links = find_links(line, SyntaxFamily::Markdown, false);

        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].id, "a");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "b");
    }

    #[test]
    fn test_multiple_matches_per_line() {
        let line = "# [[a|x]] and [[b|y]] and [[c_1-2|z]]";
        let ids: Vec<_> = find_anchors(line, SyntaxFamily::Comment, false)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c_1-2"]);
    }

    #[test]
    fn test_malformed_constructs_skipped() {
        for line in [
            "// [[greeting|Hello",
            "// [[greeting]]",
            "// [[bad id|label]]",
            "// [[|label]]",
            "// [[id|]]",
        ] {
            assert!(
                find_anchors(line, SyntaxFamily::Comment, true).is_empty(),
                "unexpected match in {line:?}"
            );
        }
    }

    #[test]
    fn test_legacy_disabled_yields_nothing() {
        let line = "// [Intro](#intro) see [Intro](intro)";
        assert!(find_anchors(line, SyntaxFamily::Comment, false).is_empty());
        assert!(find_links(line, SyntaxFamily::Comment, false).is_empty());
    }

    #[test]
    fn test_legacy_comment_forms() {
        let line = "// [Intro](#intro) see [Back](intro)";
        let anchors = find_anchors(line, SyntaxFamily::Comment, true);
        let links = find_links(line, SyntaxFamily::Comment, true);

        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].id, "intro");
        assert_eq!(anchors[0].selection.slice(line), "Intro");
        assert_eq!(anchors[0].span.slice(line), "[Intro](#intro)");
        assert_eq!(anchors[0].pattern, Pattern::LegacyAnchor);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "intro");
        assert_eq!(links[0].selection.slice(line), "Back");
        assert_eq!(links[0].pattern.form(), SyntaxForm::Legacy);
    }

    #[test]
    fn test_legacy_markdown_forms() {
        let line = "[Setup](<>#setup) then [go](<>setup) but not [web](https://x.io)";
        let anchors = find_anchors(line, SyntaxFamily::Markdown, true);
        let links = find_links(line, SyntaxFamily::Markdown, true);

        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].id, "setup");
        assert_eq!(anchors[0].span.slice(line), "[Setup](<>#setup)");

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "setup");
        assert_eq!(links[0].selection.slice(line), "go");
    }

    #[test]
    fn test_markdown_ignores_comment_legacy_forms() {
        let line = "[Intro](#intro)";
        assert!(find_anchors(line, SyntaxFamily::Markdown, true).is_empty());
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let line = "// héllo [[ünïcode|naïve label]]";
        let found = find_anchors(line, SyntaxFamily::Comment, false);
        // non-ASCII ids are rejected, so nothing here
        assert!(found.is_empty());

        let line = "// héllo [[ok|naïve label]]";
        let found = find_anchors(line, SyntaxFamily::Comment, false);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].selection.slice(line), "naïve label");
    }

    #[test]
    fn test_span_helpers() {
        let span = Span::new(3, 8);
        assert_eq!(span.len(), 5);
        assert!(span.touches(3));
        assert!(span.touches(8));
        assert!(!span.touches(9));
        assert_eq!(Span::new(10, 20).slice("short"), "");
    }
}
