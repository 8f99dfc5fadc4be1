//! Single-slot debounce timer
//!
//! Scheduling a new call aborts the previous one if it has not fired yet,
//! so a burst of triggers produces exactly one call after it quiesces.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Single-slot delayed task runner
#[derive(Debug, Default)]
pub struct Debouncer {
    slot: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Run `task` after `delay`, replacing any pending call
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the pending call, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.slot.take() {
            handle.abort();
        }
    }

    /// Whether a scheduled call has not completed yet
    pub fn is_pending(&self) -> bool {
        self.slot.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
