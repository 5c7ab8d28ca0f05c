use crate::runtime::context::CURRENT_TIMER;
use crate::runtime::timer::{Command, TimerEntry};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

/// Deadline offset used when `now + duration` is not representable.
///
/// Roughly thirty years, so a sleep of `Duration::MAX` never fires in
/// practice.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Creates a future that completes after the given duration.
///
/// Durations too large to form a deadline are clamped to [`FAR_FUTURE`].
///
/// # Panics
///
/// The returned future panics if polled outside of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// A future that completes once a specific deadline is reached.
///
/// The timer is registered on first poll and again whenever the task is
/// polled with a different waker. Dropping the future cancels it.
pub struct Sleep {
    /// Absolute point in time when the sleep completes.
    deadline: Instant,

    /// Waker the current registration will notify.
    waker: Option<Waker>,

    /// Cancellation flag of the current registration.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    pub(crate) fn new(duration: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(duration)
            .unwrap_or_else(|| now + FAR_FUTURE);

        Self {
            deadline,
            waker: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the instant at which the sleep completes.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    fn register(&mut self, waker: &Waker) {
        // Retire the previous registration before handing out a new one.
        self.cancelled.store(true, Ordering::Release);
        self.cancelled = Arc::new(AtomicBool::new(false));
        self.waker = Some(waker.clone());

        let entry = TimerEntry {
            deadline: self.deadline,
            waker: waker.clone(),
            cancelled: self.cancelled.clone(),
        };

        CURRENT_TIMER.with(|cell| {
            let binding = cell.borrow();
            let timer = binding.as_ref().expect("Sleep polled outside of runtime");

            let _ = timer.send(Command::Schedule(entry));
        });
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if Instant::now() >= this.deadline {
            return Poll::Ready(());
        }

        let stale = this
            .waker
            .as_ref()
            .is_none_or(|waker| !waker.will_wake(cx.waker()));

        if stale {
            this.register(cx.waker());
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    /// Cancels the pending registration so the timer does not wake a task
    /// that no longer waits on it.
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huge_duration_is_clamped() {
        let before = Instant::now();
        let sleep = sleep(Duration::MAX);

        assert!(sleep.deadline() >= before + FAR_FUTURE);
    }

    #[test]
    fn test_deadline_follows_duration() {
        let before = Instant::now();
        let sleep = sleep(Duration::from_millis(10));

        assert!(sleep.deadline() >= before + Duration::from_millis(10));
        assert!(sleep.deadline() < before + Duration::from_secs(10));
    }
}
