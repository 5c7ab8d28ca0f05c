//! Event dispatcher.
//!
//! The [`EventManager`] owns a pool of dispatch threads that perform channel
//! transfers on behalf of submitters. Submission never blocks: it returns an
//! [`EventHandle`] right away, and the submitting task suspends on that
//! handle while a dispatch worker runs the attempt.
//!
//! The manager is an explicit service. It is built once, shared through
//! cloneable [`EventManagerHandle`]s, and shut down either explicitly or when
//! the owning `EventManager` is dropped.

mod builder;
mod dispatch;
mod worker;

pub use builder::EventManagerBuilder;

use crate::error::EventError;
use crate::event::{Event, EventHandle};
use crate::utils::WorkQueue;
use dispatch::{Dispatch, Job};
use worker::Worker;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

/// The event dispatcher.
///
/// Owns the dispatch worker threads. Dereferences to its
/// [`EventManagerHandle`], so events can be submitted through either.
///
/// Dropping the manager shuts it down: workers finish the event they are
/// running, events still queued resolve as
/// [`Interrupted`](EventError::Interrupted), and the threads are joined.
pub struct EventManager {
    /// Submission handle shared with call sites.
    handle: EventManagerHandle,

    /// Join handles of the dispatch threads.
    workers: Vec<JoinHandle<()>>,
}

impl EventManager {
    /// Returns a builder to configure a new manager.
    pub fn builder() -> EventManagerBuilder {
        EventManagerBuilder::new()
    }

    /// Creates a manager with the default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Spawns the dispatch threads described by `config`.
    ///
    /// # Panics
    ///
    /// Panics if a dispatch thread cannot be spawned.
    pub(crate) fn start(config: EventManagerBuilder) -> Self {
        let queue: Arc<WorkQueue<Box<dyn Job>>> = Arc::new(WorkQueue::new());

        let workers = (0..config.worker_threads)
            .map(|id| {
                let worker = Worker::new(id, queue.clone());

                thread::Builder::new()
                    .name(format!("{}-{id}", config.thread_name))
                    .spawn(move || worker.run())
                    .expect("failed to spawn dispatch worker")
            })
            .collect();

        debug!(
            workers = config.worker_threads,
            idle_attempt_limit = ?config.idle_attempt_limit,
            "event manager started"
        );

        Self {
            handle: EventManagerHandle {
                inner: Arc::new(Shared {
                    queue,
                    worker_threads: config.worker_threads,
                    idle_attempt_limit: config.idle_attempt_limit,
                }),
            },
            workers,
        }
    }

    /// Returns a cloneable submission handle.
    pub fn handle(&self) -> EventManagerHandle {
        self.handle.clone()
    }

    /// Stops the dispatcher.
    ///
    /// New submissions are rejected, running events finish, queued events
    /// resolve as interrupted and all workers are joined. Calling it more
    /// than once is a no-op.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        let queue = &self.handle.inner.queue;
        queue.shutdown();

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }

        let abandoned = queue.drain();
        debug!(abandoned = abandoned.len(), "event manager stopped");
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for EventManager {
    type Target = EventManagerHandle;

    fn deref(&self) -> &EventManagerHandle {
        &self.handle
    }
}

impl Drop for EventManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("worker_threads", &self.handle.worker_threads())
            .field("pending_events", &self.handle.pending_events())
            .finish()
    }
}

/// State shared by the manager, its handles and its workers.
struct Shared {
    queue: Arc<WorkQueue<Box<dyn Job>>>,
    worker_threads: usize,
    idle_attempt_limit: Option<usize>,
}

/// Cloneable handle used to submit events to an [`EventManager`].
///
/// Handles stay valid after the manager shut down; submissions then resolve
/// immediately as interrupted.
#[derive(Clone)]
pub struct EventManagerHandle {
    inner: Arc<Shared>,
}

impl EventManagerHandle {
    /// Submits an event and returns its completion handle immediately.
    ///
    /// Events are rejected before dispatch, with an already resolved handle,
    /// when:
    /// - the buffer region is out of bounds ([`EventError::Bounds`]),
    /// - the channel is closed ([`EventError::ChannelClosed`]),
    /// - the manager has shut down ([`EventError::Interrupted`]).
    pub fn submit<T>(&self, event: Event<T>) -> EventHandle<T>
    where
        T: Send + Sync + 'static,
    {
        if let Err(err) = event.validate() {
            trace!(?event, error = %err, "event rejected");
            return EventHandle::ready(event.into_result(Err(err)));
        }

        if !event.channel().is_open() {
            trace!(?event, "event rejected: channel closed");
            return EventHandle::ready(event.into_result(Err(EventError::ChannelClosed)));
        }

        trace!(?event, "event submitted");

        let (handle, completion) = EventHandle::pending();
        let job: Box<dyn Job> = Box::new(Dispatch::new(event, completion));

        // A rejected job resolves its handle as interrupted when dropped.
        if let Err(job) = self.inner.queue.push(job) {
            drop(job);
        }

        handle
    }

    /// Number of dispatch worker threads.
    pub fn worker_threads(&self) -> usize {
        self.inner.worker_threads
    }

    /// Consecutive zero-progress attempts the completion utilities tolerate.
    pub fn idle_attempt_limit(&self) -> Option<usize> {
        self.inner.idle_attempt_limit
    }

    /// Number of accepted events not yet picked up by a worker.
    pub fn pending_events(&self) -> usize {
        self.inner.queue.len()
    }

    /// Returns `true` once the manager has shut down.
    pub fn is_shutdown(&self) -> bool {
        self.inner.queue.is_shutdown()
    }
}

impl fmt::Debug for EventManagerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManagerHandle")
            .field("worker_threads", &self.inner.worker_threads)
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}
