use crate::runtime::executor::TaskQueue;
use crate::runtime::timer::TimerHandle;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Run queue of the runtime the current thread belongs to.
    ///
    /// Used by [`spawn`](crate::task::spawn) to schedule new tasks without
    /// explicit parameter passing.
    pub(crate) static CURRENT_QUEUE: RefCell<Option<Arc<TaskQueue>>> =
        const { RefCell::new(None) };

    /// Timer driver of the runtime the current thread belongs to.
    pub(crate) static CURRENT_TIMER: RefCell<Option<TimerHandle>> =
        const { RefCell::new(None) };
}

/// Installs the runtime context on the current thread for the duration of
/// `f`, then restores the previous one.
pub(crate) fn enter_context<R>(
    queue: Arc<TaskQueue>,
    timer: TimerHandle,
    f: impl FnOnce() -> R,
) -> R {
    let prev_queue = CURRENT_QUEUE.with(|q| q.replace(Some(queue)));
    let prev_timer = CURRENT_TIMER.with(|t| t.replace(Some(timer)));

    let out = f();

    CURRENT_TIMER.with(|t| t.replace(prev_timer));
    CURRENT_QUEUE.with(|q| q.replace(prev_queue));

    out
}
