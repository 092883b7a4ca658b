//! Duplicate anchor ids
//!
//! Detection is a plain count over the rebuilt anchor list. Reporting is
//! stateful: a new or changed duplicate set is surfaced at once, then
//! repeated on a fixed interval until a rebuild finds none.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::anchors::scan::Anchor;

/// Maximum number of ids named in one notice
pub const MAX_LISTED_IDS: usize = 5;

/// An id defined more than once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub id: String,
    pub count: usize,
}

/// Ids with more than one definition, sorted by id
pub fn find_duplicates(anchors: &[Anchor]) -> Vec<Duplicate> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for anchor in anchors {
        *counts.entry(anchor.id.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| Duplicate {
            id: id.to_string(),
            count,
        })
        .collect()
}

/// User-facing duplicate warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateNotice {
    /// At most [`MAX_LISTED_IDS`] ids
    pub ids: Vec<String>,
    /// How many more ids were left out
    pub overflow: usize,
}

impl DuplicateNotice {
    pub fn from_ids(ids: &[String]) -> Self {
        Self {
            ids: ids.iter().take(MAX_LISTED_IDS).cloned().collect(),
            overflow: ids.len().saturating_sub(MAX_LISTED_IDS),
        }
    }
}

impl fmt::Display for DuplicateNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duplicate anchor ID detected: {}", self.ids.join(", "))?;
        if self.overflow > 0 {
            write!(f, " and {} more", self.overflow)?;
        }
        write!(f, ". Please rename to a unique ID")
    }
}

/// Tracks the current duplicate set and its reminder timer
#[derive(Debug)]
pub struct DuplicateNotifier {
    ids: Vec<String>,
    interval: Duration,
    reminder: Option<Interval>,
}

impl DuplicateNotifier {
    pub fn new(interval: Duration) -> Self {
        Self {
            ids: Vec::new(),
            interval,
            reminder: None,
        }
    }

    /// Record the duplicates of a finished rebuild. Returns a notice to show
    /// immediately when the set became non-empty or changed.
    pub fn update(&mut self, duplicates: &[Duplicate]) -> Option<DuplicateNotice> {
        let ids: Vec<String> = duplicates.iter().map(|d| d.id.clone()).collect();

        if ids.is_empty() {
            self.ids.clear();
            self.reminder = None;
            return None;
        }

        if ids == self.ids && self.reminder.is_some() {
            return None;
        }

        self.ids = ids;
        let mut reminder = interval_at(Instant::now() + self.interval, self.interval);
        reminder.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.reminder = Some(reminder);
        Some(DuplicateNotice::from_ids(&self.ids))
    }

    /// Resolves on the next reminder tick; never resolves while there are
    /// no duplicates
    pub async fn reminder(&mut self) -> DuplicateNotice {
        match self.reminder.as_mut() {
            Some(interval) => {
                interval.tick().await;
                DuplicateNotice::from_ids(&self.ids)
            }
            None => std::future::pending().await,
        }
    }

    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        self.reminder.is_some()
    }

    #[allow(dead_code)]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
