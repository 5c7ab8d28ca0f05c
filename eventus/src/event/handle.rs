use super::EventResult;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

/// Single-use slot shared between a dispatched event and its handle.
///
/// The first call to [`complete`](Self::complete) stores the result; later
/// calls are ignored, so an event resolves exactly once no matter which path
/// (worker, rejection, shutdown) gets there first.
pub(crate) struct Completion<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

struct Slot<T> {
    /// Result waiting to be taken by the handle.
    result: Option<EventResult<T>>,

    /// Set once a result has been stored, even after it was taken.
    done: bool,

    /// Waker of the task awaiting the handle, if any.
    waker: Option<Waker>,
}

impl<T> Completion<T> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                result: None,
                done: false,
                waker: None,
            }),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the result and wakes whoever is waiting on it.
    pub(crate) fn complete(&self, result: EventResult<T>) {
        let waker = {
            let mut slot = self.lock();

            if slot.done {
                return;
            }

            slot.result = Some(result);
            slot.done = true;
            slot.waker.take()
        };

        self.ready.notify_all();

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Completion handle of a submitted event.
///
/// `EventHandle` is a [`Future`] resolving to the event's [`EventResult`].
/// Synchronous callers can block on it with [`wait`](Self::wait) instead.
///
/// Dropping the handle does **not** cancel the event; the transfer still
/// runs and its result is discarded.
pub struct EventHandle<T> {
    completion: Arc<Completion<T>>,
}

impl<T> EventHandle<T> {
    /// Creates an unresolved handle and the slot the dispatcher fills.
    pub(crate) fn pending() -> (Self, Arc<Completion<T>>) {
        let completion = Arc::new(Completion::new());

        (
            Self {
                completion: completion.clone(),
            },
            completion,
        )
    }

    /// Creates a handle that is already resolved.
    pub(crate) fn ready(result: EventResult<T>) -> Self {
        let (handle, completion) = Self::pending();
        completion.complete(result);
        handle
    }

    /// Returns `true` once the event has produced its result.
    pub fn is_complete(&self) -> bool {
        self.completion.lock().done
    }

    /// Blocks the current thread until the result is available.
    ///
    /// # Panics
    ///
    /// Panics if the result was already taken by polling the handle.
    pub fn wait(self) -> EventResult<T> {
        let mut slot = self.completion.lock();

        while !slot.done {
            slot = self
                .completion
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }

        slot.result
            .take()
            .expect("EventHandle result already taken")
    }
}

impl<T> Future for EventHandle<T> {
    type Output = EventResult<T>;

    /// Polls the handle.
    ///
    /// The waker is stored under the same lock the dispatcher takes to
    /// publish the result, so a completion cannot slip between the check and
    /// the registration.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.completion.lock();

        if slot.done {
            let result = slot
                .result
                .take()
                .expect("EventHandle polled after completion");

            return Poll::Ready(result);
        }

        let stale = slot
            .waker
            .as_ref()
            .is_none_or(|waker| !waker.will_wake(cx.waker()));

        if stale {
            slot.waker = Some(cx.waker().clone());
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventContext, EventKind};
    use std::thread;
    use std::time::Duration;

    fn result(n: usize) -> EventResult<()> {
        EventResult::new(EventKind::Write, Ok(n), vec![0; 4], EventContext::default())
    }

    #[test]
    fn test_first_completion_wins() {
        let (handle, completion) = EventHandle::pending();
        assert!(!handle.is_complete());

        completion.complete(result(3));
        completion.complete(result(1));

        assert!(handle.is_complete());
        assert_eq!(handle.wait().outcome().ok(), Some(3));
    }

    #[test]
    fn test_wait_blocks_until_completed() {
        let (handle, completion) = EventHandle::pending();

        let completer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            completion.complete(result(4));
        });

        assert_eq!(handle.wait().outcome().ok(), Some(4));
        completer.join().unwrap();
    }

    #[test]
    fn test_ready_handle_is_complete() {
        let handle = EventHandle::ready(result(2));
        assert!(handle.is_complete());
    }
}
