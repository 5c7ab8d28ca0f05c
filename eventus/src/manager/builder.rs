use super::EventManager;

use std::thread;

/// Default cap on consecutive zero-progress attempts in a full read or write.
pub(crate) const DEFAULT_IDLE_ATTEMPT_LIMIT: usize = 1024;

/// Builder for configuring and creating an [`EventManager`].
///
/// # Examples
///
/// ```rust,ignore
/// let manager = EventManager::builder()
///     .worker_threads(4)
///     .idle_attempt_limit(Some(64))
///     .build();
/// ```
pub struct EventManagerBuilder {
    /// Number of dispatch worker threads.
    pub(crate) worker_threads: usize,

    /// Name given to every dispatch thread.
    pub(crate) thread_name: String,

    /// Consecutive zero-progress attempts tolerated by the completion
    /// utilities, or `None` for no limit.
    pub(crate) idle_attempt_limit: Option<usize>,
}

impl EventManagerBuilder {
    /// Creates a builder with default configuration.
    ///
    /// The number of dispatch workers defaults to the number of available
    /// logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: String::from("eventus-dispatch"),
            idle_attempt_limit: Some(DEFAULT_IDLE_ATTEMPT_LIMIT),
        }
    }

    /// Sets the number of dispatch worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Sets the name of the dispatch threads.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets the number of consecutive zero-progress attempts after which a
    /// full read or write fails as stalled. `None` removes the limit, which
    /// is only safe for channels that always make progress, fail, or reach
    /// end-of-stream.
    ///
    /// # Panics
    ///
    /// Panics if the limit is `Some(0)`.
    pub fn idle_attempt_limit(mut self, limit: Option<usize>) -> Self {
        assert!(limit != Some(0), "idle_attempt_limit must be > 0");

        self.idle_attempt_limit = limit;
        self
    }

    /// Starts the dispatch workers and returns the manager.
    pub fn build(self) -> EventManager {
        EventManager::start(self)
    }
}

impl Default for EventManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
