//! Document reading
//!
//! Provides consistent handling for:
//! - Oversized files
//! - Binary files
//! - Non-UTF-8 files (decoded lossily)

use std::fs;
use std::path::Path;

use crate::core::error::IndexError;

/// Default maximum file size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Number of leading bytes inspected for NUL bytes
const BINARY_PROBE_LEN: usize = 8192;

/// Read a text document, rejecting binary and oversized files
pub fn read_document(path: &Path, max_file_size: u64) -> Result<String, IndexError> {
    let metadata = fs::metadata(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() > max_file_size {
        return Err(IndexError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: max_file_size,
        });
    }

    let bytes = fs::read(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    decode_text(path, bytes)
}

/// Turn raw bytes into text, treating NUL-bearing content as binary
fn decode_text(path: &Path, bytes: Vec<u8>) -> Result<String, IndexError> {
    let check_len = std::cmp::min(BINARY_PROBE_LEN, bytes.len());
    if bytes[..check_len].contains(&0) {
        return Err(IndexError::Binary {
            path: path.to_path_buf(),
        });
    }

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// Truncate a string to at most `max_bytes`, respecting char boundaries
pub fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_utf8_document() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a.rs");
        fs::write(&path, "// [[a|b]]\n").unwrap();

        let content = read_document(&path, DEFAULT_MAX_FILE_SIZE).unwrap();
        assert_eq!(content, "// [[a|b]]\n");
    }

    #[test]
    fn test_read_missing_document() {
        let temp = tempdir().unwrap();
        let err = read_document(&temp.path().join("nope.rs"), DEFAULT_MAX_FILE_SIZE).unwrap_err();
        assert!(matches!(err, IndexError::Read { .. }));
    }

    #[test]
    fn test_binary_document_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blob.js");
        fs::write(&path, b"// [[a|b]]\0\0\0").unwrap();

        let err = read_document(&path, DEFAULT_MAX_FILE_SIZE).unwrap_err();
        assert!(matches!(err, IndexError::Binary { .. }));
    }

    #[test]
    fn test_oversized_document_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("big.md");
        fs::write(&path, "x".repeat(64)).unwrap();

        let err = read_document(&path, 16).unwrap_err();
        assert!(matches!(err, IndexError::TooLarge { size: 64, max: 16, .. }));
    }

    #[test]
    fn test_lossy_decoding() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("latin1.py");
        fs::write(&path, b"# caf\xe9 [[x|y]]").unwrap();

        let content = read_document(&path, DEFAULT_MAX_FILE_SIZE).unwrap();
        assert!(content.contains("[[x|y]]"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_truncate_at_char_boundary() {
        assert_eq!(truncate_at_char_boundary("hello world", 5), "hello");
        assert_eq!(truncate_at_char_boundary("short", 100), "short");
        assert_eq!(truncate_at_char_boundary("你好世界", 7), "你好");
    }
}
