use super::TaskQueue;
use crate::runtime::context::enter_context;
use crate::runtime::timer::TimerHandle;

use std::sync::Arc;

use tracing::trace;

/// A worker thread of the executor.
///
/// Workers pop tasks from the shared run queue and poll them with the
/// runtime context installed, parking while the queue is empty.
pub(crate) struct Worker {
    /// Index of the worker inside the executor.
    id: usize,

    /// Run queue shared with the other workers.
    queue: Arc<TaskQueue>,

    /// Timer driver handle installed for `sleep` and `timeout`.
    timer: TimerHandle,
}

impl Worker {
    pub(crate) fn new(id: usize, queue: Arc<TaskQueue>, timer: TimerHandle) -> Self {
        Self { id, queue, timer }
    }

    /// Runs the worker loop until the run queue is shut down.
    pub(crate) fn run(self) {
        trace!(worker = self.id, "runtime worker started");

        enter_context(self.queue.clone(), self.timer.clone(), || {
            while let Some(task) = self.queue.pop() {
                task.run();
            }
        });
    }
}
