//! Path normalization utilities
//!
//! All file identities are root-relative and use '/' as separator.

use std::path::{Path, PathBuf};

/// Tool-specific ignore file at the workspace root
pub const TOOL_IGNORE_FILE: &str = ".anchorlinkignore";

/// VCS ignore file, honored only when enabled
pub const VCS_IGNORE_FILE: &str = ".gitignore";

/// Untracked, VCS-local tool ignore file (read last)
pub const LOCAL_IGNORE_FILE: &str = ".git/info/anchorlinkignore";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Join a normalized relative path onto a base directory
pub fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    base.join(relative.replace('/', std::path::MAIN_SEPARATOR_STR))
}

/// File name component of a normalized path
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether a root-relative path names one of the ignore-stack files
pub fn is_ignore_file(relative: &str) -> bool {
    relative == LOCAL_IGNORE_FILE
        || matches!(file_name(relative), TOOL_IGNORE_FILE | VCS_IGNORE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("src/main.rs")), "src/main.rs");
        assert_eq!(normalize_path(Path::new("a/b/c/d.rs")), "a/b/c/d.rs");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        let path = Path::new("/project/src/main.rs");
        assert_eq!(make_relative(path, root), Some("src/main.rs".to_string()));
    }

    #[test]
    fn test_make_relative_not_under_root() {
        let root = Path::new("/project");
        let path = Path::new("/other/file.rs");
        assert_eq!(make_relative(path, root), None);
    }

    #[test]
    fn test_join_normalized() {
        let result = join_normalized(Path::new("/project"), "src/main.rs");
        assert!(result.ends_with("main.rs"));
        assert!(result.to_string_lossy().contains("src"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("docs/guide.md"), "guide.md");
        assert_eq!(file_name("README.md"), "README.md");
    }

    #[test]
    fn test_is_ignore_file() {
        assert!(is_ignore_file(".anchorlinkignore"));
        assert!(is_ignore_file("sub/.gitignore"));
        assert!(is_ignore_file(".git/info/anchorlinkignore"));
        assert!(!is_ignore_file("src/ignore.rs"));
    }
}
