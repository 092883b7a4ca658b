//! Debounce timer
//!
//! Scheduling replaces any pending deadline, so a burst of triggers inside
//! the window collapses into a single rebuild after the last one.

use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, Sleep};

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Pin<Box<Sleep>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and start a fresh window
    pub fn schedule(&mut self) {
        self.deadline = Some(Box::pin(sleep(self.window)));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Resolves once the pending window elapses; never resolves when idle.
    /// Safe to use in `select!`: the deadline survives a dropped future.
    pub async fn elapsed(&mut self) {
        match self.deadline.as_mut() {
            Some(deadline) => {
                deadline.as_mut().await;
                self.deadline = None;
            }
            None => std::future::pending().await,
        }
    }
}
