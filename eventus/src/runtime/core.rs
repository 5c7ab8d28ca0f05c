use super::executor::core::Executor;
use super::task::JoinHandle;
use super::timer::{self, Command, TimerHandle};

use std::future::Future;
use std::sync::mpsc;
use std::thread;

use tracing::debug;

/// The runtime that hosts the suspended callers of [`read_full`] and
/// [`write_full`].
///
/// `Runtime` is responsible for:
/// - spawning asynchronous tasks,
/// - driving task execution via the executor,
/// - running the timer driver used by [`time`](crate::time),
/// - providing a synchronous entry point via [`block_on`](Self::block_on).
///
/// Dropping the runtime shuts down all internal components in an orderly
/// fashion.
///
/// [`read_full`]: crate::io::read_full
/// [`write_full`]: crate::io::write_full
pub struct Runtime {
    /// Task executor responsible for scheduling and running futures.
    executor: Executor,

    /// Handle to the timer thread.
    timer: TimerHandle,

    /// Timer thread, joined on drop.
    timer_thread: Option<thread::JoinHandle<()>>,
}

impl Runtime {
    /// Creates a new runtime with `worker_threads` executor threads whose
    /// names start with `thread_name`.
    pub(crate) fn new(worker_threads: usize, thread_name: &str) -> Self {
        let (timer, timer_thread) = timer::start(&format!("{thread_name}-timer"));
        let executor = Executor::new(timer.clone(), worker_threads, thread_name);

        debug!(worker_threads, "runtime started");

        Self {
            executor,
            timer,
            timer_thread: Some(timer_thread),
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let handle = runtime.spawn(async { 42 });
    /// ```
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// Internally, the future is spawned onto the executor and its
    /// result is sent back through a channel.
    ///
    /// # Panics
    ///
    /// Panics if the future panics or the runtime shuts down before it
    /// completes.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async { 42 });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (transmitter, receiver) = mpsc::channel();

        self.executor.spawn(async move {
            let result = future.await;
            let _ = transmitter.send(result);
        });

        receiver
            .recv()
            .expect("block_on future panicked or the runtime shut down")
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// 1. Signals the executor to stop
    /// 2. Joins all worker threads
    /// 3. Stops and joins the timer thread
    fn drop(&mut self) {
        self.executor.shutdown();
        self.executor.join();

        let _ = self.timer.send(Command::Shutdown);

        if let Some(thread) = self.timer_thread.take() {
            let _ = thread.join();
        }

        debug!("runtime stopped");
    }
}
