//! Runtime settings
//!
//! Collected from global CLI flags (each with an `ANCHORLINK_*` environment
//! fallback) and handed to discovery, scanning and the rebuild coordinator.

use std::path::PathBuf;
use std::time::Duration;

use crate::anchors::kind::FileTypes;
use crate::core::file_reader::DEFAULT_MAX_FILE_SIZE;

/// Quiet period after the last trigger before a rebuild runs
pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;

/// Interval between repeated duplicate-id warnings
pub const DEFAULT_DUPLICATE_INTERVAL_MS: u64 = 5000;

/// Settings shared by every indexing component
#[derive(Debug, Clone)]
pub struct Settings {
    /// Workspace root (all file identities are relative to it)
    pub root: PathBuf,

    /// Scan the retired `[text](#id)` / `[text](<>id)` forms too
    pub legacy_syntax: bool,

    /// Add `.gitignore` patterns to the ignore stack
    pub use_gitignore: bool,

    /// Extension → kind table
    pub file_types: FileTypes,

    /// Debounce window for rebuild triggers
    pub debounce: Duration,

    /// Repeat interval for duplicate warnings
    pub duplicate_interval: Duration,

    /// Files larger than this are skipped
    pub max_file_size: u64,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            legacy_syntax: false,
            use_gitignore: false,
            file_types: FileTypes::default(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            duplicate_interval: Duration::from_millis(DEFAULT_DUPLICATE_INTERVAL_MS),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_legacy_syntax(mut self, enabled: bool) -> Self {
        self.legacy_syntax = enabled;
        self
    }

    pub fn with_gitignore(mut self, enabled: bool) -> Self {
        self.use_gitignore = enabled;
        self
    }

    pub fn with_file_types(mut self, file_types: FileTypes) -> Self {
        self.file_types = file_types;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_duplicate_interval(mut self, interval: Duration) -> Self {
        self.duplicate_interval = interval;
        self
    }
}
