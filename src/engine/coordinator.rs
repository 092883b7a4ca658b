//! Rebuild coordinator
//!
//! Single async task that owns the index store. The first trigger rebuilds
//! at once; later triggers are debounced. Rebuilds run on the blocking pool
//! and are awaited, so triggers that arrive meanwhile wait in the channel
//! and schedule the next one.
//!
//! ```text
//! Uninitialized --trigger--> Indexing --ok--> Idle --trigger/debounce--> Indexing
//!                               |
//!                               +--error--> previous state
//! ```

use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::backends::workspace::Workspace;
use crate::core::config::Settings;
use crate::engine::debounce::Debouncer;
use crate::engine::duplicates::{DuplicateNotice, DuplicateNotifier};
use crate::engine::rebuild::{rebuild, RebuildOutcome, RebuildSummary};
use crate::engine::store::{IndexReader, IndexStore};

/// Something that may have changed the set of anchors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    WorkspaceReady,
    DocumentEdited(String),
    FileCreated(String),
    FileDeleted(String),
    FileModified(String),
    /// A directory, or a path of unknown type, appeared, vanished or was
    /// renamed. Watchers report only the directory, not the files inside.
    TreeChanged(String),
    IgnoreFileChanged(String),
}

impl Trigger {
    /// Root-relative path the trigger concerns, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Trigger::WorkspaceReady => None,
            Trigger::DocumentEdited(p)
            | Trigger::FileCreated(p)
            | Trigger::FileDeleted(p)
            | Trigger::FileModified(p)
            | Trigger::TreeChanged(p)
            | Trigger::IgnoreFileChanged(p) => Some(p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Indexing,
    Idle,
}

/// Outbound events for whoever presents the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Published(RebuildSummary),
    Duplicates(DuplicateNotice),
    IndexingFailed(String),
}

enum Event {
    Trigger(Option<Trigger>),
    DebounceElapsed,
    DuplicateReminder(DuplicateNotice),
}

pub struct Coordinator<W> {
    workspace: Arc<W>,
    legacy: bool,
    state: State,
    store: IndexStore,
    debouncer: Debouncer,
    duplicates: DuplicateNotifier,
    notices: UnboundedSender<Notice>,
}

impl<W: Workspace + Send + Sync + 'static> Coordinator<W> {
    pub fn new(workspace: W, settings: &Settings, notices: UnboundedSender<Notice>) -> Self {
        Self {
            workspace: Arc::new(workspace),
            legacy: settings.legacy_syntax,
            state: State::Uninitialized,
            store: IndexStore::new(),
            debouncer: Debouncer::new(settings.debounce),
            duplicates: DuplicateNotifier::new(settings.duplicate_interval),
            notices,
        }
    }

    pub fn reader(&self) -> IndexReader {
        self.store.reader()
    }

    /// Process triggers until every sender is dropped
    pub async fn run(mut self, mut triggers: UnboundedReceiver<Trigger>) {
        loop {
            let event = tokio::select! {
                trigger = triggers.recv() => Event::Trigger(trigger),
                _ = self.debouncer.elapsed() => Event::DebounceElapsed,
                notice = self.duplicates.reminder() => Event::DuplicateReminder(notice),
            };

            match event {
                Event::Trigger(Some(trigger)) => self.handle_trigger(trigger).await,
                Event::Trigger(None) => break,
                Event::DebounceElapsed => self.rebuild_now().await,
                Event::DuplicateReminder(notice) => {
                    info!(%notice, "duplicate anchor ids still present");
                    self.notify(Notice::Duplicates(notice));
                }
            }
        }
        debug!("coordinator stopped");
    }

    /// Rebuild immediately when uninitialized, otherwise (re)start the
    /// debounce window
    pub async fn handle_trigger(&mut self, trigger: Trigger) {
        if !self.is_relevant(&trigger) {
            debug!(?trigger, "ignoring trigger for unsupported path");
            return;
        }

        match self.state {
            State::Uninitialized => self.rebuild_now().await,
            State::Indexing | State::Idle => {
                debug!(
                    ?trigger,
                    restarted = self.debouncer.is_pending(),
                    window_ms = self.debouncer.window().as_millis() as u64,
                    "scheduling rebuild"
                );
                self.debouncer.schedule();
            }
        }
    }

    fn is_relevant(&self, trigger: &Trigger) -> bool {
        match trigger {
            Trigger::WorkspaceReady | Trigger::IgnoreFileChanged(_) => true,
            Trigger::TreeChanged(path) => {
                self.workspace.is_relevant(path) || self.workspace.may_contain_files(path)
            }
            other => other
                .path()
                .map(|p| self.workspace.is_relevant(p))
                .unwrap_or(false),
        }
    }

    /// Run a full rebuild now, cancelling any pending debounce
    pub async fn rebuild_now(&mut self) {
        self.debouncer.cancel();
        let previous = self.state;
        self.state = State::Indexing;

        match rebuild_blocking(Arc::clone(&self.workspace), self.legacy).await {
            Ok(outcome) => self.publish(outcome),
            Err(message) => {
                error!(error = %message, "indexing failed");
                self.state = previous;
                self.notify(Notice::IndexingFailed(message));
            }
        }
    }

    fn publish(&mut self, outcome: RebuildOutcome) {
        let summary = outcome.summary();
        self.store.publish(outcome.index);
        info!(
            files = summary.files,
            anchors = summary.anchors,
            "published anchor index"
        );
        self.notify(Notice::Published(summary));

        if let Some(notice) = self.duplicates.update(&outcome.duplicates) {
            info!(%notice, "duplicate anchor ids");
            self.notify(Notice::Duplicates(notice));
        }
        self.state = State::Idle;
    }

    fn notify(&self, notice: Notice) {
        // nobody listening is fine
        let _ = self.notices.send(notice);
    }
}

/// Run a rebuild on the blocking pool so file I/O stays off the
/// coordinator task
async fn rebuild_blocking<W>(workspace: Arc<W>, legacy: bool) -> Result<RebuildOutcome, String>
where
    W: Workspace + Send + Sync + 'static,
{
    tokio::task::spawn_blocking(move || rebuild(workspace.as_ref(), legacy))
        .await
        .map_err(|e| format!("rebuild task failed: {e}"))?
        .map_err(|e| e.to_string())
}
