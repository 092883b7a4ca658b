//! File watching
//!
//! Translates `notify` events under the workspace root into rebuild
//! triggers. Hidden paths are dropped here except for the VCS-local ignore
//! file; classification is left to the coordinator. Directory events and
//! renames become [`Trigger::TreeChanged`] because watchers do not report
//! the files inside a moved or deleted directory.

use anyhow::{Context, Result};
use colored::Colorize;
use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{debug, info, trace, warn};

use crate::anchors::resolve::LinkReport;
use crate::backends::ignore_rules::has_hidden_component;
use crate::backends::workspace::FsWorkspace;
use crate::core::config::Settings;
use crate::core::paths::{is_ignore_file, make_relative};
use crate::engine::coordinator::{Coordinator, Notice, Trigger};

/// Map one file-system event to triggers, one per affected path
pub fn event_triggers(root: &Path, event: &Event) -> Vec<Trigger> {
    event
        .paths
        .iter()
        .filter_map(|path| {
            let relative = make_relative(path, root)?;
            if relative.is_empty() {
                return None;
            }
            if is_ignore_file(&relative) {
                return Some(Trigger::IgnoreFileChanged(relative));
            }
            if has_hidden_component(&relative) {
                return None;
            }
            match event.kind {
                EventKind::Create(CreateKind::Folder)
                | EventKind::Remove(RemoveKind::Folder | RemoveKind::Any | RemoveKind::Other)
                | EventKind::Modify(ModifyKind::Name(_)) => Some(Trigger::TreeChanged(relative)),
                EventKind::Create(_) if path.is_dir() => Some(Trigger::TreeChanged(relative)),
                EventKind::Create(_) => Some(Trigger::FileCreated(relative)),
                EventKind::Remove(_) => Some(Trigger::FileDeleted(relative)),
                EventKind::Modify(ModifyKind::Data(_)) => Some(Trigger::DocumentEdited(relative)),
                EventKind::Modify(_) => Some(Trigger::FileModified(relative)),
                _ => None,
            }
        })
        .collect()
}

/// Start a recursive watcher on `root`. Dropping the watcher stops it.
pub fn watch_root(
    root: &Path,
    triggers: UnboundedSender<Trigger>,
) -> notify::Result<RecommendedWatcher> {
    let base: PathBuf = root.to_path_buf();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            for trigger in event_triggers(&base, &event) {
                trace!(?trigger, "file event");
                // receiver gone means the coordinator stopped
                let _ = triggers.send(trigger);
            }
        }
        Err(e) => debug!(error = %e, "watch error"),
    })?;

    watcher.watch(root, RecursiveMode::Recursive)?;
    debug!(root = %root.display(), "watching workspace");
    Ok(watcher)
}

/// Human-readable line for a coordinator notice
pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::Published(summary) => format!(
            "{} {} files, {} anchors, {} ids ({} ms)",
            "indexed".green().bold(),
            summary.files,
            summary.anchors,
            summary.ids,
            summary.elapsed.as_millis()
        ),
        Notice::Duplicates(duplicates) => {
            format!("{} {}", "duplicate".yellow().bold(), duplicates)
        }
        Notice::IndexingFailed(message) => {
            format!("{} {}", "failed".red().bold(), message)
        }
    }
}

/// Human-readable line for link counts after a publication
pub fn format_link_report(report: &LinkReport) -> String {
    let unresolved = if report.unresolved == 0 {
        "0 unresolved".normal()
    } else {
        format!("{} unresolved", report.unresolved).yellow()
    };
    format!(
        "{} {} resolved, {} in {} files",
        "links".cyan().bold(),
        report.resolved,
        unresolved,
        report.files
    )
}

/// Run the watch command until interrupted
pub fn run_watch(settings: &Settings) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(watch_workspace(settings.clone()))
}

async fn watch_workspace(settings: Settings) -> Result<()> {
    let (trigger_tx, trigger_rx) = unbounded_channel();
    let (notice_tx, mut notices) = unbounded_channel();

    let _watcher = watch_root(&settings.root, trigger_tx.clone())
        .with_context(|| format!("failed to watch {}", settings.root.display()))?;

    let workspace = Arc::new(FsWorkspace::new(&settings));
    let coordinator = Coordinator::new(workspace.as_ref().clone(), &settings, notice_tx);
    let mut reader = coordinator.reader();
    trigger_tx
        .send(Trigger::WorkspaceReady)
        .context("coordinator channel closed")?;

    let mut task = tokio::spawn(coordinator.run(trigger_rx));
    let legacy = settings.legacy_syntax;

    loop {
        tokio::select! {
            _ = &mut task => break,
            Some(notice) = notices.recv() => println!("{}", format_notice(&notice)),
            true = reader.changed() => {
                let resolver = reader.resolver();
                let workspace = Arc::clone(&workspace);
                match tokio::task::spawn_blocking(move || resolver.report(workspace.as_ref(), legacy)).await {
                    Ok(report) => println!("{}", format_link_report(&report)),
                    Err(e) => warn!(error = %e, "link report failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping watch");
                break;
            }
        }
    }

    task.abort();
    Ok(())
}
