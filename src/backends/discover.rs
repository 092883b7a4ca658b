//! File discovery
//!
//! Walks the workspace with the `ignore` crate's walker, pruning hidden
//! entries and anything the ignore stack excludes, and keeps only files
//! whose kind is known.

use anyhow::Result;
use ignore::WalkBuilder;
use serde_json::json;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::anchors::kind::{FileKind, FileTypes};
use crate::backends::ignore_rules::{has_hidden_component, IgnoreFilter};
use crate::core::config::Settings;
use crate::core::error::IndexError;
use crate::core::model::{ResultItem, ResultSet};
use crate::core::paths::make_relative;
use crate::core::render::{RenderConfig, Renderer};

/// Enumerates indexable files under one root
#[derive(Debug, Clone)]
pub struct Discovery {
    root: PathBuf,
    file_types: FileTypes,
    filter: Arc<IgnoreFilter>,
}

impl Discovery {
    /// Load the ignore stack for `root` (read fresh on every call)
    pub fn load(root: &Path, file_types: FileTypes, use_gitignore: bool) -> Result<Self, IndexError> {
        let filter = IgnoreFilter::load(root, use_gitignore)?;
        debug!(root = %root.display(), patterns = filter.pattern_count(), "loaded ignore rules");
        Ok(Self {
            root: root.to_path_buf(),
            file_types,
            filter: Arc::new(filter),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, IndexError> {
        Self::load(
            &settings.root,
            settings.file_types.clone(),
            settings.use_gitignore,
        )
    }

    /// Kind of a root-relative file path, if the walk would return it
    pub fn accepts(&self, relative: &str) -> Option<FileKind> {
        if has_hidden_component(relative)
            || self.filter.is_excluded(relative, false)
            || self.parent_excluded(relative)
        {
            return None;
        }
        self.file_types.classify(relative)
    }

    /// Whether the walk would descend into a root-relative directory
    pub fn accepts_dir(&self, relative: &str) -> bool {
        !has_hidden_component(relative)
            && !self.filter.is_excluded(relative, true)
            && !self.parent_excluded(relative)
    }

    // an excluded ancestor would have been pruned during the walk
    fn parent_excluded(&self, relative: &str) -> bool {
        let mut ancestor = relative;
        while let Some((parent, _)) = ancestor.rsplit_once('/') {
            if self.filter.is_excluded(parent, true) {
                return true;
            }
            ancestor = parent;
        }
        false
    }

    /// Eligible files, root-relative, in walk order (sorted by name per
    /// directory), without duplicates
    pub fn files(&self) -> Result<Vec<String>, IndexError> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        let root = self.root.clone();
        let filter = Arc::clone(&self.filter);
        builder.filter_entry(move |entry| {
            let relative = match make_relative(entry.path(), &root) {
                Some(r) if !r.is_empty() => r,
                _ => return true,
            };
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !filter.is_excluded(&relative, is_dir)
        });

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        let mut visited_root = false;

        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(source) if !visited_root => {
                    return Err(IndexError::Enumerate {
                        root: self.root.clone(),
                        source,
                    });
                }
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            visited_root = true;

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let relative = match make_relative(entry.path(), &self.root) {
                Some(r) => r,
                None => continue,
            };

            if !self.file_types.is_supported(&relative) {
                continue;
            }

            if seen.insert(relative.clone()) {
                files.push(relative);
            }
        }

        debug!(root = %self.root.display(), count = files.len(), "discovered files");
        Ok(files)
    }

    pub fn file_types(&self) -> &FileTypes {
        &self.file_types
    }
}

/// File items for every eligible file
pub fn list_files(settings: &Settings) -> Result<ResultSet> {
    let discovery = Discovery::from_settings(settings)?;
    let mut result_set = ResultSet::new();

    for path in discovery.files()? {
        let kind = discovery.file_types().classify(&path);
        result_set.push(ResultItem::file(path).with_data(json!({ "kind": kind })));
    }

    result_set.sort();
    Ok(result_set)
}

/// Run the files command
pub fn run_files(settings: &Settings, config: RenderConfig) -> Result<()> {
    let result_set = list_files(settings)?;

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
