//! Host task scheduling seam
//!
//! The framework never manages threads of its own. Async command bodies are
//! submitted here, and the POST-phase continuation is submitted alongside the
//! body so it runs strictly after the body completes, success or failure.

use parking_lot::Mutex;
use std::collections::VecDeque;

/// A unit of work submitted to the host
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Host scheduler contract
pub trait Scheduler: Send + Sync {
    /// Submit a task for asynchronous execution
    fn submit_async(&self, task: Task);

    /// Submit a task plus a continuation that runs strictly after it returns
    fn submit_async_then(&self, task: Task, continuation: Task);
}

/// Production scheduler backed by a tokio runtime
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime of the calling context
    ///
    /// Panics outside a tokio runtime, same as [`tokio::runtime::Handle::current`].
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn submit_async(&self, task: Task) {
        self.handle.spawn_blocking(task);
    }

    fn submit_async_then(&self, task: Task, continuation: Task) {
        // One worker runs both, which is what guarantees the ordering.
        self.handle.spawn_blocking(move || {
            task();
            continuation();
        });
    }
}

/// Scheduler that queues tasks until explicitly drained
///
/// For hosts that drive background work from their own tick loop, and for
/// tests that need to observe the gap between submission and execution.
pub struct ManualScheduler {
    queue: Mutex<VecDeque<Task>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run every queued task in submission order; returns how many ran
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        loop {
            let Some(task) = self.queue.lock().pop_front() else {
                break;
            };
            task();
            count += 1;
        }
        count
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn submit_async(&self, task: Task) {
        self.queue.lock().push_back(task);
    }

    fn submit_async_then(&self, task: Task, continuation: Task) {
        self.queue.lock().push_back(Box::new(move || {
            task();
            continuation();
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_manual_scheduler_defers_until_drained() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&counter);
        scheduler.submit_async(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_continuation_runs_after_task() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let body = Arc::clone(&order);
        let post = Arc::clone(&order);
        scheduler.submit_async_then(
            Box::new(move || body.lock().push("body")),
            Box::new(move || post.lock().push("post")),
        );
        scheduler.run_pending();

        assert_eq!(*order.lock(), vec!["body", "post"]);
    }

    #[tokio::test]
    async fn test_tokio_scheduler_runs_task_and_continuation() {
        let scheduler = TokioScheduler::current();
        let (tx, rx) = tokio::sync::oneshot::channel();
        let order = Arc::new(Mutex::new(Vec::new()));

        let body = Arc::clone(&order);
        let post = Arc::clone(&order);
        scheduler.submit_async_then(
            Box::new(move || body.lock().push("body")),
            Box::new(move || {
                post.lock().push("post");
                let _ = tx.send(());
            }),
        );

        rx.await.unwrap();
        assert_eq!(*order.lock(), vec!["body", "post"]);
    }
}
