//! Unified Result Model
//!
//! Every command maps its output to this model before rendering, so anchors,
//! links, files and lint issues all share one machine-readable shape.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    File,
    Anchor,
    Link,
    Error,
}

/// Confidence level of a result (scans and index lookups are exact)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
}

/// Source mode indicating how the result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// File discovery
    Scan,
    /// Read from the anchor index
    Index,
    /// Produced by link resolution
    Resolve,
}

/// Line-based range (1-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: u32,
    pub end: u32,
}

/// Column range on a single line (1-indexed line, byte columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeColumn {
    pub line: u32,
    pub start: usize,
    pub end: usize,
}

/// Range can be either a line span or a column span on one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Range {
    Column(RangeColumn),
    Line(RangeLine),
}

impl Range {
    /// Create a new line range
    pub fn lines(start: u32, end: u32) -> Self {
        Range::Line(RangeLine { start, end })
    }

    /// Create a new column range
    pub fn columns(line: u32, start: usize, end: usize) -> Self {
        Range::Column(RangeColumn { line, start, end })
    }

    fn start_key(&self) -> (u32, usize) {
        match self {
            Range::Column(r) => (r.line, r.start),
            Range::Line(r) => (r.start, 0),
        }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Number of anchors (file groups only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchors: Option<usize>,

    /// Whether the owning file was part of the latest scan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<bool>,

    /// Whether the content was truncated
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkError {
    pub code: String,
    pub message: String,
}

impl LinkError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Range within the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,

    /// Excerpt of the content (previews, labels)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (anchor ids, spans, link targets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Confidence level
    pub confidence: Confidence,

    /// How this result was obtained
    pub source_mode: SourceMode,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<LinkError>,
}

impl ResultItem {
    fn base(kind: Kind, source_mode: SourceMode) -> Self {
        Self {
            kind,
            path: None,
            range: None,
            excerpt: None,
            data: None,
            confidence: Confidence::High,
            source_mode,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new file result
    pub fn file(path: impl Into<String>) -> Self {
        let mut item = Self::base(Kind::File, SourceMode::Scan);
        item.path = Some(path.into());
        item
    }

    /// Create a new anchor result
    pub fn anchor(path: impl Into<String>, range: Range) -> Self {
        let mut item = Self::base(Kind::Anchor, SourceMode::Index);
        item.path = Some(path.into());
        item.range = Some(range);
        item
    }

    /// Create a new link result
    pub fn link(path: impl Into<String>, range: Range) -> Self {
        let mut item = Self::base(Kind::Link, SourceMode::Resolve);
        item.path = Some(path.into());
        item.range = Some(range);
        item
    }

    /// Create a new error result
    pub fn error(error: LinkError) -> Self {
        let mut item = Self::base(Kind::Error, SourceMode::Index);
        item.errors.push(error);
        item
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set excerpt
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path and range start for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| match (&a.range, &b.range) {
                (Some(ra), Some(rb)) => ra.start_key().cmp(&rb.start_key()),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
