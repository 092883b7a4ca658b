//! Workspace access
//!
//! The rebuild only needs two things from its surroundings: the list of
//! eligible files and their text. [`FsWorkspace`] provides both from disk.

use std::path::PathBuf;
use tracing::debug;

use crate::anchors::kind::{FileKind, FileTypes};
use crate::backends::discover::Discovery;
use crate::core::config::Settings;
use crate::core::error::IndexError;
use crate::core::file_reader::read_document;
use crate::core::paths::join_normalized;

/// Text-access collaborator for the rebuild
pub trait Workspace {
    /// Eligible files, root-relative, in a deterministic order
    fn discover(&self) -> Result<Vec<String>, IndexError>;

    /// Full text of one root-relative file
    fn read(&self, path: &str) -> Result<String, IndexError>;

    /// Kind of a root-relative file, `None` if it is not indexed
    fn classify(&self, path: &str) -> Option<FileKind>;

    /// Whether a changed path should schedule a rebuild
    fn is_relevant(&self, path: &str) -> bool {
        self.classify(path).is_some()
    }

    /// Whether a changed directory may hold files the walk would return
    fn may_contain_files(&self, _path: &str) -> bool {
        true
    }
}

/// Workspace backed by the local filesystem
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
    file_types: FileTypes,
    use_gitignore: bool,
    max_file_size: u64,
}

impl FsWorkspace {
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.root.clone(),
            file_types: settings.file_types.clone(),
            use_gitignore: settings.use_gitignore,
            max_file_size: settings.max_file_size,
        }
    }

    fn discovery(&self) -> Result<Discovery, IndexError> {
        Discovery::load(&self.root, self.file_types.clone(), self.use_gitignore)
    }
}

impl Workspace for FsWorkspace {
    fn discover(&self) -> Result<Vec<String>, IndexError> {
        // ignore files are re-read on every rebuild
        self.discovery()?.files()
    }

    fn read(&self, path: &str) -> Result<String, IndexError> {
        read_document(&join_normalized(&self.root, path), self.max_file_size)
    }

    fn classify(&self, path: &str) -> Option<FileKind> {
        self.file_types.classify(path)
    }

    fn is_relevant(&self, path: &str) -> bool {
        match self.discovery() {
            Ok(discovery) => discovery.accepts(path).is_some(),
            Err(e) => {
                debug!(error = %e, "ignore rules unavailable, classifying by extension");
                self.classify(path).is_some()
            }
        }
    }

    fn may_contain_files(&self, path: &str) -> bool {
        match self.discovery() {
            Ok(discovery) => discovery.accepts_dir(path),
            Err(e) => {
                debug!(error = %e, "ignore rules unavailable, assuming directory is walked");
                true
            }
        }
    }
}
