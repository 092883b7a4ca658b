//! Link resolution
//!
//! A [`LinkResolver`] wraps one published index snapshot. Consumers build a
//! fresh resolver after every rebuild instead of re-registering providers.

use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::anchors::index::AnchorIndex;
use crate::anchors::scan::{scan_links, Anchor, Link};
use crate::backends::workspace::Workspace;
use crate::core::model::{Range, ResultItem};

/// A link whose target exists in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub link: Link,
    pub target: Anchor,
}

impl ResolvedLink {
    pub fn tooltip(&self) -> String {
        format!("Go to anchor: {}", self.link.id)
    }

    pub fn to_result_item(&self) -> ResultItem {
        let clickable = self.link.target_span();
        ResultItem::link(
            self.link.path.clone(),
            Range::columns(self.link.line + 1, clickable.start, clickable.end),
        )
        .with_excerpt(self.link.label.clone())
        .with_data(json!({
            "id": self.link.id,
            "form": self.link.form,
            "tooltip": self.tooltip(),
            "target": {
                "path": self.target.path,
                "line": self.target.line + 1,
                "start": self.target.span.start,
                "end": self.target.span.end,
            },
        }))
    }
}

/// Link counts across every file a snapshot covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Files with at least one link
    pub files: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone)]
pub struct LinkResolver {
    index: Arc<AnchorIndex>,
}

impl LinkResolver {
    pub fn new(index: Arc<AnchorIndex>) -> Self {
        Self { index }
    }

    /// Target of an id; duplicates resolve to the earliest-scanned definition
    pub fn resolve(&self, id: &str) -> Option<&Anchor> {
        self.index.find_first(id)
    }

    /// Resolve a document's links, dropping ones without a target
    pub fn document_links(&self, links: &[Link]) -> Vec<ResolvedLink> {
        links
            .iter()
            .filter_map(|link| {
                self.resolve(&link.id).map(|target| ResolvedLink {
                    link: link.clone(),
                    target: target.clone(),
                })
            })
            .collect()
    }

    /// Whether the snapshot covers `path`
    pub fn is_ready(&self, path: &str) -> bool {
        self.index.is_processed(path)
    }

    pub fn index(&self) -> &AnchorIndex {
        &self.index
    }

    /// Rescan the snapshot's files for links and count which resolve.
    /// Files that can no longer be read are left out.
    pub fn report<W: Workspace + ?Sized>(&self, workspace: &W, legacy: bool) -> LinkReport {
        let mut report = LinkReport::default();

        for path in self.index().processed_files() {
            let Some(kind) = workspace.classify(path) else {
                continue;
            };
            let text = match workspace.read(path) {
                Ok(text) => text,
                Err(e) => {
                    debug!(file = %path, error = %e, "skipping link scan");
                    continue;
                }
            };

            let links = scan_links(path, &text, kind, legacy);
            if links.is_empty() {
                continue;
            }
            let resolved = self.document_links(&links).len();
            report.files += 1;
            report.resolved += resolved;
            report.unresolved += links.len() - resolved;
        }

        report
    }
}
