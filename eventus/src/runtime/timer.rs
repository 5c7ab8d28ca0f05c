use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::task::Waker;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, trace};

/// Sending half used by tasks to talk to the timer driver.
pub(crate) type TimerHandle = Sender<Command>;

/// Commands understood by the timer driver.
pub(crate) enum Command {
    /// Wake `entry.waker` once `entry.deadline` is reached.
    Schedule(TimerEntry),

    /// Stop the driver thread.
    Shutdown,
}

/// An entry in the timer queue.
///
/// The entry may be cancelled before it fires, in which case it is
/// discarded without waking anything.
pub(crate) struct TimerEntry {
    /// The time at which the timer should fire.
    pub(crate) deadline: Instant,

    /// Waker to notify when the deadline is reached.
    pub(crate) waker: Waker,

    /// Cancellation flag shared with the associated sleep future.
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline.eq(&other.deadline)
    }
}

impl Ord for TimerEntry {
    /// Orders timer entries by deadline.
    ///
    /// The comparison is **reversed** so that a `BinaryHeap<TimerEntry>`
    /// pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Starts the timer driver on a dedicated thread named `name`.
///
/// # Panics
///
/// Panics if the thread cannot be spawned.
pub(crate) fn start(name: &str) -> (TimerHandle, JoinHandle<()>) {
    let (sender, receiver) = mpsc::channel();

    let thread = thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || drive(receiver))
        .expect("failed to spawn timer thread");

    (sender, thread)
}

/// Driver loop: sleeps until the next deadline or the next command.
fn drive(commands: Receiver<Command>) {
    let mut timers = BinaryHeap::new();

    debug!("timer driver started");

    loop {
        let command = match timers.peek() {
            Some(TimerEntry { deadline, .. }) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match commands.recv_timeout(wait) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        match command {
            Some(Command::Schedule(entry)) => timers.push(entry),
            Some(Command::Shutdown) => break,
            None => {}
        }

        fire_expired(&mut timers);
    }

    debug!(pending = timers.len(), "timer driver stopped");
}

fn fire_expired(timers: &mut BinaryHeap<TimerEntry>) {
    let now = Instant::now();

    while timers.peek().is_some_and(|entry| entry.deadline <= now) {
        let Some(entry) = timers.pop() else {
            break;
        };

        if entry.cancelled.load(AtomicOrdering::Acquire) {
            continue;
        }

        trace!("timer fired");
        entry.waker.wake();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::task::Wake;
    use std::time::Duration;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, AtomicOrdering::SeqCst);
        }
    }

    fn entry(deadline: Instant, waker: &Arc<CountingWaker>, cancelled: bool) -> TimerEntry {
        TimerEntry {
            deadline,
            waker: Waker::from(waker.clone()),
            cancelled: Arc::new(AtomicBool::new(cancelled)),
        }
    }

    #[test]
    fn heap_pops_earliest_deadline_first() {
        let waker = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let now = Instant::now();

        let mut heap = BinaryHeap::new();
        heap.push(entry(now + Duration::from_secs(3), &waker, false));
        heap.push(entry(now + Duration::from_secs(1), &waker, false));
        heap.push(entry(now + Duration::from_secs(2), &waker, false));

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|e| e.deadline.duration_since(now).as_secs())
            .collect();

        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_entries_do_not_wake() {
        let waker = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let past = Instant::now() - Duration::from_millis(1);

        let mut heap = BinaryHeap::new();
        heap.push(entry(past, &waker, true));
        heap.push(entry(past, &waker, false));

        fire_expired(&mut heap);

        assert!(heap.is_empty());
        assert_eq!(waker.0.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn driver_wakes_after_deadline() {
        let (handle, thread) = start("eventus-timer-test");
        let waker = Arc::new(CountingWaker(AtomicUsize::new(0)));

        handle
            .send(Command::Schedule(entry(
                Instant::now() + Duration::from_millis(10),
                &waker,
                false,
            )))
            .unwrap();

        thread::sleep(Duration::from_millis(100));
        handle.send(Command::Shutdown).unwrap();
        thread.join().unwrap();

        assert_eq!(waker.0.load(AtomicOrdering::SeqCst), 1);
    }
}
