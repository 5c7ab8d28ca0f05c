use super::handle::{JoinHandle, JoinState};
use super::state::{COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::runtime::context::CURRENT_QUEUE;
use crate::runtime::executor::TaskQueue;

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Wake, Waker};

use tracing::warn;

/// A runnable unit of work that can be executed by the scheduler.
///
/// The `Runnable` trait erases the output type of a task so the executor
/// can keep heterogeneous tasks in one queue as `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Polls the task once. Called by a worker thread.
    fn run(self: Arc<Self>);
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A spawned asynchronous task.
///
/// A `Task` owns its future until completion and coordinates its
/// scheduling state with the wakers handed out while polling.
pub(crate) struct Task<T> {
    /// The underlying future, dropped once it completes.
    future: Mutex<Option<BoxFuture<T>>>,

    /// Current lifecycle state (`IDLE`, `QUEUED`, ...).
    state: AtomicUsize,

    /// Queue the task is pushed back to when woken.
    queue: Arc<TaskQueue>,

    /// Result and waiter shared with the `JoinHandle`.
    pub(crate) join: Arc<JoinState<T>>,
}

impl<T: Send + 'static> Task<T> {
    /// Creates a new task in the `QUEUED` state.
    pub(crate) fn new<F>(future: F, queue: Arc<TaskQueue>) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: Mutex::new(Some(Box::pin(future))),
            state: AtomicUsize::new(QUEUED),
            queue,
            join: Arc::new(JoinState::new()),
        }
    }

    /// Polls the task once.
    ///
    /// - `Poll::Pending`: moves back to `IDLE`, or re-queues if the task was
    ///   woken meanwhile.
    /// - `Poll::Ready`: hands the output to the `JoinHandle`.
    /// - panic: the task completes with the panic payload, which the
    ///   `JoinHandle` re-raises. The worker thread keeps running.
    fn poll_once(self: Arc<Self>) {
        if self
            .state
            .compare_exchange(QUEUED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        let mut slot = self.future.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(future) = slot.as_mut() else {
            return;
        };

        let polled = catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

        match polled {
            Ok(Poll::Pending) => {
                drop(slot);

                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken while running.
                    self.state.store(QUEUED, Ordering::Release);
                    self.schedule();
                }
            }
            Ok(Poll::Ready(output)) => {
                *slot = None;
                drop(slot);

                self.state.store(COMPLETED, Ordering::Release);
                self.join.complete(Ok(output));
            }
            Err(payload) => {
                *slot = None;
                drop(slot);

                warn!("task panicked");

                self.state.store(COMPLETED, Ordering::Release);
                self.join.complete(Err(payload));
            }
        }
    }

    /// Signals the task to be polled again.
    ///
    /// An `IDLE` task is queued; a `RUNNING` task is marked `NOTIFIED` so it
    /// is re-queued right after its current poll.
    fn notify(self: &Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.schedule();
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn schedule(self: &Arc<Self>) {
        // Pushes fail only once the runtime is shutting down.
        let _ = self.queue.push(self.clone());
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        self.poll_once();
    }
}

impl<T: Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.notify();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.notify();
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let handle = task::spawn(async { 21 * 2 });
/// assert_eq!(handle.await, 42);
/// ```
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let queue = CURRENT_QUEUE.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    spawn_on(&queue, future)
}

/// Spawns a future onto `queue`.
pub(crate) fn spawn_on<F, T>(queue: &Arc<TaskQueue>, future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let task = Arc::new(Task::new(future, queue.clone()));
    let handle = JoinHandle::new(task.join.clone());

    let _ = queue.push(task);

    handle
}
