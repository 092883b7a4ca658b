//! Anchor API - list, get and links operations
//!
//! One-shot commands: each builds a fresh index with a full rebuild and
//! answers from it.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::anchors::index::AnchorIndex;
use crate::anchors::resolve::LinkResolver;
use crate::anchors::scan::scan_links;
use crate::backends::workspace::{FsWorkspace, Workspace};
use crate::core::config::Settings;
use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{make_relative, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::engine::rebuild::rebuild;

/// Build the index for the configured workspace
pub fn build_index(settings: &Settings) -> Result<AnchorIndex> {
    let workspace = FsWorkspace::new(settings);
    let outcome = rebuild(&workspace, settings.legacy_syntax)
        .with_context(|| format!("failed to index {}", settings.root.display()))?;
    Ok(outcome.index)
}

/// All anchors, sorted by id (equal ids keep scan order)
pub fn list_anchors(index: &AnchorIndex) -> ResultSet {
    index.anchors().iter().map(|a| a.to_result_item()).collect()
}

/// One file item per file with anchors, sorted by path
pub fn list_by_file(index: &AnchorIndex) -> ResultSet {
    index
        .file_groups()
        .into_iter()
        .map(|(path, count)| {
            ResultItem::file(path).with_meta(Meta {
                anchors: Some(count),
                processed: Some(index.is_processed(path)),
                ..Default::default()
            })
        })
        .collect()
}

/// Location of the first-scanned definition of `id`; empty when unknown
pub fn get_anchor(index: &AnchorIndex, id: &str) -> ResultSet {
    let mut result_set = ResultSet::new();
    if let Some(anchor) = index.find_first(id) {
        let definitions = index.find_all(id).len();
        let mut item = anchor.to_result_item();
        if let Some(serde_json::Value::Object(data)) = item.data.as_mut() {
            data.insert("definitions".to_string(), json!(definitions));
        }
        result_set.push(item);
    }
    result_set
}

/// Resolved links in one document; unresolved links are omitted
pub fn document_links(
    settings: &Settings,
    resolver: &LinkResolver,
    file: &Path,
) -> Result<ResultSet> {
    let workspace = FsWorkspace::new(settings);
    let relative = root_relative(&settings.root, file);

    let kind = match workspace.classify(&relative) {
        Some(kind) => kind,
        None => bail!("unsupported file type: {}", relative),
    };
    let text = workspace
        .read(&relative)
        .with_context(|| format!("failed to read {}", relative))?;

    let links = scan_links(&relative, &text, kind, settings.legacy_syntax);
    let processed = resolver.is_ready(&relative);

    let mut result_set: ResultSet = resolver
        .document_links(&links)
        .iter()
        .map(|resolved| {
            resolved.to_result_item().with_meta(Meta {
                processed: Some(processed),
                ..Default::default()
            })
        })
        .collect();
    result_set.sort();
    Ok(result_set)
}

/// Interpret a CLI path as root-relative
fn root_relative(root: &Path, file: &Path) -> String {
    if file.is_absolute() {
        if let Some(relative) = make_relative(file, root) {
            return relative;
        }
    }
    normalize_path(file).trim_start_matches("./").to_string()
}

fn print(result_set: &ResultSet, config: RenderConfig) {
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(result_set));
}

/// Run anchor list command
pub fn run_list(settings: &Settings, by_file: bool, config: RenderConfig) -> Result<()> {
    let index = build_index(settings)?;
    let result_set = if by_file {
        list_by_file(&index)
    } else {
        list_anchors(&index)
    };
    print(&result_set, config);
    Ok(())
}

/// Run anchor get command
pub fn run_get(settings: &Settings, id: &str, config: RenderConfig) -> Result<()> {
    let index = build_index(settings)?;
    print(&get_anchor(&index, id), config);
    Ok(())
}

/// Run links command
pub fn run_links(settings: &Settings, file: &Path, config: RenderConfig) -> Result<()> {
    let resolver = LinkResolver::new(Arc::new(build_index(settings)?));
    let result_set = document_links(settings, &resolver, file)?;
    print(&result_set, config);
    Ok(())
}
