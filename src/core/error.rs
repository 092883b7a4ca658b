//! Engine error types.

use std::path::PathBuf;

/// Errors raised while discovering, reading or indexing workspace files.
///
/// File-scoped variants (`Read`, `Binary`, `TooLarge`) are recovered per file
/// by the rebuild; the rest abort a whole rebuild and are surfaced once.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The workspace walk itself failed.
    #[error("failed to enumerate {}: {source}", root.display())]
    Enumerate {
        /// Workspace root being walked.
        root: PathBuf,
        /// Underlying walker error.
        #[source]
        source: ignore::Error,
    },

    /// An ignore pattern could not be compiled.
    #[error("invalid ignore pattern `{pattern}`: {source}")]
    IgnorePattern {
        /// Normalized pattern that failed.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: globset::Error,
    },

    /// A file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contains NUL bytes and is treated as binary.
    #[error("binary content: {}", path.display())]
    Binary {
        /// File that looked binary.
        path: PathBuf,
    },

    /// The file exceeds the readable size limit.
    #[error("file too large ({size} bytes, max {max}): {}", path.display())]
    TooLarge {
        /// File that exceeded the limit.
        path: PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Maximum accepted size in bytes.
        max: u64,
    },

    /// A `--file-type` mapping could not be parsed.
    #[error("invalid file type mapping `{mapping}` (expected EXT=KIND, kinds: {known})")]
    FileTypeMapping {
        /// Raw mapping text.
        mapping: String,
        /// Comma-separated list of accepted kind names.
        known: String,
    },
}

impl IndexError {
    /// Whether the error concerns a single file rather than the whole rebuild.
    #[allow(dead_code)]
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            IndexError::Read { .. } | IndexError::Binary { .. } | IndexError::TooLarge { .. }
        )
    }
}
