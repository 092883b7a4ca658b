//! Anchor index
//!
//! In-memory id → definitions mapping plus the set of files that took part
//! in the latest successful scan. An index is built once and replaced as a
//! whole; it is never patched in place.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::anchors::scan::Anchor;

#[derive(Debug, Clone, Default)]
pub struct AnchorIndex {
    /// All records in insertion order
    anchors: Vec<Anchor>,
    /// id → positions in `anchors`, insertion order
    by_id: HashMap<String, Vec<usize>>,
    /// Files of the latest scan, including files without anchors
    processed: HashSet<String>,
}

impl AnchorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the current mapping and rebuild it from `anchors` in order.
    /// The processed set is reset to the files those anchors came from.
    pub fn replace(&mut self, anchors: Vec<Anchor>) {
        let mut by_id: HashMap<String, Vec<usize>> = HashMap::new();
        let mut processed = HashSet::new();

        for (pos, anchor) in anchors.iter().enumerate() {
            by_id.entry(anchor.id.clone()).or_default().push(pos);
            processed.insert(anchor.path.clone());
        }

        self.anchors = anchors;
        self.by_id = by_id;
        self.processed = processed;
    }

    /// Replace the processed-file set
    pub fn set_processed<I, S>(&mut self, files: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processed = files.into_iter().map(Into::into).collect();
    }

    /// Earliest-inserted definition of `id`
    pub fn find_first(&self, id: &str) -> Option<&Anchor> {
        self.by_id
            .get(id)
            .and_then(|positions| positions.first())
            .map(|&pos| &self.anchors[pos])
    }

    /// Every definition of `id`, in insertion order
    pub fn find_all(&self, id: &str) -> Vec<&Anchor> {
        self.by_id
            .get(id)
            .map(|positions| positions.iter().map(|&pos| &self.anchors[pos]).collect())
            .unwrap_or_default()
    }

    /// Whether `path` was part of the most recent scan
    pub fn is_processed(&self, path: &str) -> bool {
        self.processed.contains(path)
    }

    /// All records in insertion order
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Processed files, sorted
    pub fn processed_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.processed.iter().map(String::as_str).collect();
        files.sort_unstable();
        files
    }

    /// file → anchor count, sorted by path
    pub fn file_groups(&self) -> BTreeMap<&str, usize> {
        let mut groups = BTreeMap::new();
        for anchor in &self.anchors {
            *groups.entry(anchor.path.as_str()).or_insert(0) += 1;
        }
        groups
    }

    /// Number of distinct ids
    pub fn id_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
