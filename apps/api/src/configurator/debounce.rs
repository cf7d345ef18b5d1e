//! Trailing-edge debounce for deferred commits.
//!
//! Live keystrokes should not each trigger a full state transition; the
//! commit runs once the input has been quiet for the configured window.
//! [`Debouncer::schedule`] cancels whatever was armed before and arms the new
//! commit, so only the latest value ever lands. Dropping the debouncer aborts
//! anything still pending, which keeps a torn-down session from receiving a
//! late commit.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Cancellable trailing-edge scheduler for a single input source.
///
/// Must be used from within a Tokio runtime: `schedule` spawns the timer task.
pub struct Debouncer {
    delay: Duration,
    /// Monotonic ticket counter shared with armed tasks. A task only runs its
    /// commit if its ticket is still the latest when the timer fires, which
    /// closes the race between a firing timer and a concurrent re-arm.
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// Arms `commit` to run after the quiet window, cancelling any commit
    /// armed earlier.
    pub fn schedule<F>(&mut self, commit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = self.pending.take() {
            task.abort();
        }
        let latest = Arc::clone(&self.latest);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) == ticket {
                commit.await;
            }
        }));
    }

    /// Cancels any armed commit without running it.
    pub fn cancel(&mut self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// True while a commit is armed and its window has not yet closed.
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
