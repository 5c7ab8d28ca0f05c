use super::dispatch::Job;
use crate::utils::WorkQueue;

use std::sync::Arc;

use tracing::debug;

/// A dispatch thread.
///
/// Workers take events off the shared queue in submission order and run the
/// channel primitive. A worker never retries; it runs one attempt and
/// publishes its result.
pub(crate) struct Worker {
    /// Index of the worker inside the pool.
    id: usize,

    /// Queue shared with the manager and the other workers.
    queue: Arc<WorkQueue<Box<dyn Job>>>,
}

impl Worker {
    pub(crate) fn new(id: usize, queue: Arc<WorkQueue<Box<dyn Job>>>) -> Self {
        Self { id, queue }
    }

    /// Runs events until the queue is shut down.
    pub(crate) fn run(self) {
        debug!(worker = self.id, "dispatch worker started");

        while let Some(job) = self.queue.pop() {
            job.run();
        }

        debug!(worker = self.id, "dispatch worker stopped");
    }
}
