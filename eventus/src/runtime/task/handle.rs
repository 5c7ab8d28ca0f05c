use std::future::Future;
use std::panic::resume_unwind;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};
use std::thread;

/// Output slot shared between a task and its `JoinHandle`.
pub(crate) struct JoinState<T> {
    inner: Mutex<JoinSlot<T>>,
}

struct JoinSlot<T> {
    /// Task output, or the payload of the panic that ended it.
    output: Option<thread::Result<T>>,
    waker: Option<Waker>,
}

impl<T> JoinState<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(JoinSlot {
                output: None,
                waker: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JoinSlot<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the task outcome and wakes the awaiting handle.
    pub(crate) fn complete(&self, output: thread::Result<T>) {
        let waker = {
            let mut slot = self.lock();
            slot.output = Some(output);
            slot.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// A handle to a spawned task.
///
/// A `JoinHandle` implements [`Future`] and resolves to the task's output
/// once it has completed.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its result.
///
/// # Panics
///
/// Awaiting the handle of a task that panicked resumes that panic in the
/// awaiting task.
pub struct JoinHandle<T> {
    state: Arc<JoinState<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(state: Arc<JoinState<T>>) -> Self {
        Self { state }
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    /// Polls the join handle.
    ///
    /// The output is checked and the waker registered under one lock, so a
    /// task finishing concurrently cannot be missed.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut slot = self.state.lock();

        match slot.output.take() {
            Some(Ok(output)) => return Poll::Ready(output),
            Some(Err(payload)) => {
                drop(slot);
                resume_unwind(payload);
            }
            None => {}
        }

        slot.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}
