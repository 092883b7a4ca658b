//! Full rebuild
//!
//! Enumerate, scan, sort, index. A file that cannot be read contributes no
//! anchors but still counts as processed; only enumeration failures abort.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::anchors::index::AnchorIndex;
use crate::anchors::scan::{scan_anchors, Anchor};
use crate::backends::workspace::Workspace;
use crate::core::error::IndexError;
use crate::engine::duplicates::{find_duplicates, Duplicate};

/// Result of one successful rebuild
#[derive(Debug)]
pub struct RebuildOutcome {
    pub index: AnchorIndex,
    pub duplicates: Vec<Duplicate>,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub elapsed: Duration,
}

/// Counts reported after publication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildSummary {
    pub files: usize,
    pub skipped: usize,
    pub anchors: usize,
    pub ids: usize,
    pub duplicates: usize,
    pub elapsed: Duration,
}

impl RebuildOutcome {
    pub fn summary(&self) -> RebuildSummary {
        RebuildSummary {
            files: self.files_scanned,
            skipped: self.files_skipped,
            anchors: self.index.len(),
            ids: self.index.id_count(),
            duplicates: self.duplicates.len(),
            elapsed: self.elapsed,
        }
    }
}

/// Build a fresh index from every eligible file in the workspace
pub fn rebuild<W: Workspace + ?Sized>(
    workspace: &W,
    legacy: bool,
) -> Result<RebuildOutcome, IndexError> {
    let start = Instant::now();
    info!("rebuilding anchor index");

    let files = workspace.discover()?;

    let mut anchors: Vec<Anchor> = Vec::new();
    let mut skipped = 0;

    for path in &files {
        let kind = match workspace.classify(path) {
            Some(kind) => kind,
            None => continue,
        };
        match workspace.read(path) {
            Ok(text) => {
                let found = scan_anchors(path, &text, kind, legacy);
                debug!(file = %path, anchors = found.len(), "scanned");
                anchors.extend(found);
            }
            Err(e) => {
                debug!(file = %path, error = %e, "skipping unreadable file");
                skipped += 1;
            }
        }
    }

    // stable: equal ids keep scan order, so find_first is the earliest file
    anchors.sort_by(|a, b| a.id.cmp(&b.id));
    let duplicates = find_duplicates(&anchors);

    let mut index = AnchorIndex::new();
    index.replace(anchors);
    index.set_processed(files.iter().cloned());

    let elapsed = start.elapsed();
    info!(
        files = files.len(),
        skipped,
        anchors = index.len(),
        duplicates = duplicates.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "anchor index rebuilt"
    );

    Ok(RebuildOutcome {
        index,
        duplicates,
        files_scanned: files.len(),
        files_skipped: skipped,
        elapsed,
    })
}
