//! Idle-tick posting for the UI loop
//!
//! Work posted to an [`IdleQueue`] never runs inline with the caller. It runs
//! the next time the loop that owns the queue calls [`IdleQueue::run_pending`],
//! which the dialog host does after a layout pass and before dispatching the
//! next input event.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::trace;

/// A unit of deferred UI work
pub type IdleTask = Box<dyn FnOnce() + Send + 'static>;

/// FIFO queue of work deferred to the next idle tick
pub struct IdleQueue {
    sender: mpsc::UnboundedSender<IdleTask>,
    receiver: Mutex<mpsc::UnboundedReceiver<IdleTask>>,
    pending: AtomicUsize,
}

impl IdleQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
            pending: AtomicUsize::new(0),
        }
    }

    /// Post a task to run on the next idle tick
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        // The counter never trails the channel; a concurrent drain must not
        // subtract a task that has not been counted yet.
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(Box::new(task)).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Number of tasks waiting for the next idle tick
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Run every task posted before this call, in posting order.
    ///
    /// Tasks posted while running are left for the next tick. Returns the
    /// number of tasks that ran.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<IdleTask> = {
            let mut receiver = self
                .receiver
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let mut batch = Vec::new();
            while let Ok(task) = receiver.try_recv() {
                batch.push(task);
            }
            batch
        };

        let count = batch.len();
        self.pending.fetch_sub(count, Ordering::SeqCst);
        for task in batch {
            task();
        }

        if count > 0 {
            trace!("Ran {} idle task(s)", count);
        }
        count
    }
}

impl Default for IdleQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdleQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
