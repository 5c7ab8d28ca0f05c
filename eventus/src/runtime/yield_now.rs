use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future returned by [`yield_now`].
///
/// Pending on the first poll, after re-scheduling its own task; ready on
/// the next one.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Yields execution back to the executor once.
///
/// The task is moved to the back of the run queue, so every task already
/// queued is polled before it resumes. Full transfers call this between
/// zero-progress attempts.
///
/// # Examples
///
/// ```rust,ignore
/// eventus::yield_now().await;
/// ```
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}
