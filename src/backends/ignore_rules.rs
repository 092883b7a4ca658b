//! Ignore stack
//!
//! Layered exclusion patterns, merged as a plain union:
//!
//! 1. `.gitignore` at the root (only when enabled)
//! 2. `.anchorlinkignore` at the root
//! 3. `.git/info/anchorlinkignore`
//!
//! Patterns are compiled with `globset` into one filter for files and one
//! for directories, so excluded directories are pruned during the walk.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::core::error::IndexError;
use crate::core::paths::{join_normalized, LOCAL_IGNORE_FILE, TOOL_IGNORE_FILE, VCS_IGNORE_FILE};

/// Always excluded, regardless of ignore files
pub const BUILTIN_PATTERNS: &[&str] = &["node_modules/"];

/// Ignore files in read order; the flag marks the VCS file
const IGNORE_SOURCES: &[(&str, bool)] = &[
    (VCS_IGNORE_FILE, true),
    (TOOL_IGNORE_FILE, false),
    (LOCAL_IGNORE_FILE, false),
];

/// Split ignore-file content into patterns
pub fn parse_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            if line.starts_with('!') {
                debug!(pattern = %line, "dropping negated ignore pattern");
                return false;
            }
            true
        })
        .map(str::to_string)
        .collect()
}

/// Read every enabled ignore file under `root`, in order.
/// Missing or unreadable files contribute nothing.
pub fn load_patterns(root: &Path, use_gitignore: bool) -> Vec<String> {
    let mut patterns: Vec<String> = BUILTIN_PATTERNS.iter().map(|p| p.to_string()).collect();

    for (relative, is_vcs) in IGNORE_SOURCES {
        if *is_vcs && !use_gitignore {
            continue;
        }
        let path = join_normalized(root, relative);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let parsed = parse_patterns(&content);
                debug!(file = %relative, count = parsed.len(), "loaded ignore patterns");
                patterns.extend(parsed);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => debug!(file = %relative, error = %e, "skipping unreadable ignore file"),
        }
    }

    patterns
}

/// Glob forms for one pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPattern {
    /// Globs matched against file paths
    pub files: Vec<String>,
    /// Globs matched against directory paths (for pruning)
    pub dirs: Vec<String>,
}

/// Expand a raw pattern into root-relative glob forms:
///
/// - `/x`  matches only at the root
/// - `x/`  matches a directory at any depth
/// - `x`   matches a file or directory at any depth
pub fn normalize(pattern: &str) -> NormalizedPattern {
    let anchored = pattern.starts_with('/');
    let dir_only = pattern.ends_with('/');
    let body = pattern.trim_start_matches('/').trim_end_matches('/');

    if body.is_empty() {
        return NormalizedPattern {
            files: Vec::new(),
            dirs: Vec::new(),
        };
    }

    let deep = if body.starts_with("**/") {
        body.to_string()
    } else {
        format!("**/{body}")
    };

    match (anchored, dir_only) {
        (true, true) => NormalizedPattern {
            files: vec![format!("{body}/**")],
            dirs: vec![body.to_string()],
        },
        (true, false) => NormalizedPattern {
            files: vec![body.to_string(), format!("{body}/**")],
            dirs: vec![body.to_string()],
        },
        (false, true) => NormalizedPattern {
            files: vec![format!("{body}/**"), format!("{deep}/**")],
            dirs: vec![body.to_string(), deep],
        },
        (false, false) => NormalizedPattern {
            files: vec![deep.clone(), format!("{deep}/**")],
            dirs: vec![deep],
        },
    }
}

/// Whether any path component is hidden (starts with '.')
pub fn has_hidden_component(relative: &str) -> bool {
    relative
        .split('/')
        .any(|part| part.starts_with('.') && part != "." && part != "..")
}

/// Compiled exclusion filter
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    files: GlobSet,
    dirs: GlobSet,
    pattern_count: usize,
}

impl IgnoreFilter {
    /// Compile the ignore stack for `root`
    pub fn load(root: &Path, use_gitignore: bool) -> Result<Self, IndexError> {
        Self::build(&load_patterns(root, use_gitignore))
    }

    /// Compile raw patterns
    pub fn build<S: AsRef<str>>(patterns: &[S]) -> Result<Self, IndexError> {
        let mut files = GlobSetBuilder::new();
        let mut dirs = GlobSetBuilder::new();

        for pattern in patterns {
            let normalized = normalize(pattern.as_ref());
            for glob in &normalized.files {
                files.add(compile(glob)?);
            }
            for glob in &normalized.dirs {
                dirs.add(compile(glob)?);
            }
        }

        let set_error = |source| IndexError::IgnorePattern {
            pattern: "<ignore set>".to_string(),
            source,
        };

        Ok(Self {
            files: files.build().map_err(set_error)?,
            dirs: dirs.build().map_err(set_error)?,
            pattern_count: patterns.len(),
        })
    }

    /// Whether a root-relative path is excluded
    pub fn is_excluded(&self, relative: &str, is_dir: bool) -> bool {
        if is_dir {
            self.dirs.is_match(relative)
        } else {
            self.files.is_match(relative)
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }
}

fn compile(glob: &str) -> Result<globset::Glob, IndexError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map_err(|source| IndexError::IgnorePattern {
            pattern: glob.to_string(),
            source,
        })
}
