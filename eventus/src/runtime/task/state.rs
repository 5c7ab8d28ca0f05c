/// Task is idle and not scheduled.
///
/// The future returned `Poll::Pending` and waits for its waker.
pub(crate) const IDLE: usize = 0;

/// Task is queued for execution.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being polled by a worker.
///
/// At most one worker may observe this state at a time.
pub(crate) const RUNNING: usize = 2;

/// Task has completed execution.
///
/// The future has returned `Poll::Ready` and will not be polled again.
pub(crate) const COMPLETED: usize = 3;

/// Task was woken while running.
///
/// It is queued again as soon as the current poll returns.
pub(crate) const NOTIFIED: usize = 4;
