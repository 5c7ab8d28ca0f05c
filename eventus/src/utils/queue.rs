use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A shared FIFO queue feeding a pool of worker threads.
///
/// Producers [`push`](Self::push) jobs from any thread; workers block in
/// [`pop`](Self::pop) until a job arrives or the queue is shut down. The
/// shutdown flag lives under the same lock as the jobs, so a push either
/// lands before shutdown (and is later popped or drained) or is handed back
/// to the producer.
pub(crate) struct WorkQueue<J> {
    /// Pending jobs and the shutdown flag.
    state: Mutex<State<J>>,

    /// Signalled when a job is pushed or the queue shuts down.
    condvar: Condvar,
}

struct State<J> {
    jobs: VecDeque<J>,
    shutdown: bool,
}

impl<J> WorkQueue<J> {
    /// Creates an empty, open queue.
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            condvar: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<J>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues a job and wakes one parked worker.
    ///
    /// Returns the job back if the queue has been shut down.
    pub(crate) fn push(&self, job: J) -> Result<(), J> {
        {
            let mut state = self.lock();

            if state.shutdown {
                return Err(job);
            }

            state.jobs.push_back(job);
        }

        self.condvar.notify_one();
        Ok(())
    }

    /// Takes the next job, parking the calling thread while the queue is
    /// empty.
    ///
    /// Returns `None` once the queue is shut down. Jobs still queued at that
    /// point are left for [`drain`](Self::drain).
    pub(crate) fn pop(&self) -> Option<J> {
        let mut state = self.lock();

        loop {
            if state.shutdown {
                return None;
            }

            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }

            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Refuses new jobs and wakes every parked worker.
    pub(crate) fn shutdown(&self) {
        self.lock().shutdown = true;
        self.condvar.notify_all();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) was called.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Removes every queued job.
    pub(crate) fn drain(&self) -> Vec<J> {
        self.lock().jobs.drain(..).collect()
    }

    /// Number of jobs waiting to be picked up.
    pub(crate) fn len(&self) -> usize {
        self.lock().jobs.len()
    }
}
