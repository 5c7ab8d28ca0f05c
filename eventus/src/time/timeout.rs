use super::sleep::{Sleep, sleep};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use thiserror::Error;

/// Error returned by [`timeout`] when the deadline elapses first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline has elapsed")]
pub struct Elapsed(());

/// Requires `future` to complete within `duration`.
///
/// If the deadline is reached first the inner future is dropped and
/// [`Elapsed`] is returned. Dropping an in-flight `read_full` this way
/// does not cancel the event already submitted: it still runs, and its
/// result is discarded.
///
/// # Examples
///
/// ```rust,ignore
/// let outcome = timeout(Duration::from_secs(1), read_full(&manager, &channel, buf, 0, &ctx)).await;
/// ```
pub fn timeout<F>(duration: Duration, future: F) -> Timeout<F>
where
    F: Future,
{
    Timeout::new(duration, future)
}

/// Future returned by [`timeout`].
pub struct Timeout<F> {
    future: Pin<Box<F>>,
    sleep: Sleep,
}

impl<F> Timeout<F> {
    pub(crate) fn new(duration: Duration, future: F) -> Self {
        Timeout {
            future: Box::pin(future),
            sleep: sleep(duration),
        }
    }
}

impl<F> Future for Timeout<F>
where
    F: Future,
{
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Poll::Ready(val) = this.future.as_mut().poll(cx) {
            return Poll::Ready(Ok(val));
        }

        if let Poll::Ready(()) = Pin::new(&mut this.sleep).poll(cx) {
            return Poll::Ready(Err(Elapsed(())));
        }

        Poll::Pending
    }
}
