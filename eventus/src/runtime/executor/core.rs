use super::TaskQueue;
use super::worker::Worker;
use crate::runtime::task::{JoinHandle, spawn_on};
use crate::runtime::timer::TimerHandle;

use std::future::Future;
use std::sync::Arc;
use std::thread::{self, JoinHandle as ThreadHandle};

use tracing::debug;

/// Multi-threaded task executor.
///
/// The `Executor` is responsible for:
/// - spawning worker threads,
/// - installing the runtime context on each of them,
/// - managing orderly shutdown and thread joining.
///
/// It owns the shared run queue and all worker threads.
pub(crate) struct Executor {
    /// Run queue shared by all workers.
    queue: Arc<TaskQueue>,

    /// Join handles for worker threads.
    handles: Vec<ThreadHandle<()>>,
}

impl Executor {
    /// Creates a new executor with `threads` workers named after
    /// `thread_name`.
    ///
    /// # Panics
    ///
    /// Panics if a worker thread cannot be spawned.
    pub(crate) fn new(timer: TimerHandle, threads: usize, thread_name: &str) -> Self {
        let queue = Arc::new(TaskQueue::new());

        let handles = (0..threads)
            .map(|id| {
                let worker = Worker::new(id, queue.clone(), timer.clone());

                thread::Builder::new()
                    .name(format!("{thread_name}-{id}"))
                    .spawn(move || worker.run())
                    .expect("failed to spawn runtime worker")
            })
            .collect();

        debug!(workers = threads, "executor started");

        Self { queue, handles }
    }

    /// Spawns a new task onto the executor.
    ///
    /// Tasks spawned after shutdown has begun are never polled.
    pub(crate) fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        spawn_on(&self.queue, future)
    }

    /// Signals all workers to stop and wakes the parked ones.
    pub(crate) fn shutdown(&self) {
        self.queue.shutdown();
    }

    /// Waits for all worker threads to terminate, then drops the tasks that
    /// were still queued.
    pub(crate) fn join(&mut self) {
        for h in self.handles.drain(..) {
            let _ = h.join();
        }

        let dropped = self.queue.drain().len();
        debug!(dropped, "executor stopped");
    }
}
