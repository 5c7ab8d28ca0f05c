use crate::error::EventError;
use crate::event::{Completion, Event};

use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{trace, warn};

/// A unit of work pulled from the dispatch queue.
///
/// Events with different context types share one queue through
/// `Box<dyn Job>`.
pub(crate) trait Job: Send {
    /// Performs the work on the calling dispatch worker.
    fn run(self: Box<Self>);
}

/// An accepted event together with the slot its result goes to.
///
/// If a `Dispatch` is dropped before it ran (the manager shut down with the
/// event still queued), the event resolves as interrupted.
pub(crate) struct Dispatch<T> {
    event: Option<Event<T>>,
    completion: Arc<Completion<T>>,
}

impl<T> Dispatch<T> {
    pub(crate) fn new(event: Event<T>, completion: Arc<Completion<T>>) -> Self {
        Self {
            event: Some(event),
            completion,
        }
    }
}

impl<T: Send + Sync + 'static> Job for Dispatch<T> {
    fn run(mut self: Box<Self>) {
        let Some(mut event) = self.event.take() else {
            return;
        };

        let kind = event.kind();
        let requested = event.len();

        let outcome = match catch_unwind(AssertUnwindSafe(|| event.perform())) {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(?kind, requested, "channel panicked during transfer");

                Err(EventError::Transport(io::Error::other(
                    "channel panicked during transfer",
                )))
            }
        };

        match &outcome {
            Ok(n) => trace!(?kind, requested, transferred = n, "event completed"),
            Err(err) => trace!(?kind, requested, error = %err, "event failed"),
        }

        self.completion.complete(event.into_result(outcome));
    }
}

impl<T> Drop for Dispatch<T> {
    fn drop(&mut self) {
        if let Some(event) = self.event.take() {
            trace!(kind = ?event.kind(), "event abandoned before dispatch");

            self.completion.complete(event.into_result(Err(EventError::Interrupted {
                reason: "event manager shut down before dispatch",
            })));
        }
    }
}
