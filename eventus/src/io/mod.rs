//! Full reads and full writes.
//!
//! A single [`Event`] may transfer fewer bytes than requested. The utilities
//! in this module loop over single-attempt events until the request is
//! satisfied, the channel reaches end-of-stream (reads only), or an attempt
//! fails. Exactly one event is in flight per call at any time.
//!
//! Both utilities take ownership of the buffer and return it alongside the
//! outcome, whether the call succeeded or not.
//!
//! # Zero-progress attempts
//!
//! An attempt may legitimately transfer nothing (for example a non-blocking
//! stream with no data yet). Such attempts are retried after yielding to the
//! executor. Consecutive zero-progress attempts are bounded by the manager's
//! [`idle_attempt_limit`](crate::EventManagerBuilder::idle_attempt_limit);
//! past it the call fails with [`EventError::Stalled`].

use crate::channel::SharedChannel;
use crate::error::{DispatchFailure, EventError};
use crate::event::{Event, EventContext};
use crate::manager::EventManagerHandle;
use crate::runtime::yield_now::yield_now;

use tracing::{trace, warn};

/// Outcome of a full transfer together with the buffer it operated on.
pub type BufResult<T> = (Result<T, DispatchFailure>, Vec<u8>);

/// Writes the first `size` bytes of `content` to `channel`.
///
/// Issues write events for the unwritten suffix `content[offset..size]`
/// until all `size` bytes have been accepted. On success returns `size`.
///
/// # Errors
///
/// - [`EventError::Bounds`] (attempt `0`) if `size > content.len()`; no event
///   is issued.
/// - The error of the first failing attempt. Bytes accepted by earlier
///   attempts are not reported.
/// - [`EventError::Stalled`] if too many consecutive attempts accept nothing.
///
/// # Examples
///
/// ```rust,ignore
/// let (written, content) = write_full(&manager, &channel, content, 10, &context).await;
/// assert_eq!(written?, 10);
/// ```
pub async fn write_full<T>(
    manager: &EventManagerHandle,
    channel: &SharedChannel,
    content: Vec<u8>,
    size: usize,
    context: &EventContext<T>,
) -> BufResult<usize>
where
    T: Send + Sync + 'static,
{
    if size > content.len() {
        let err = EventError::bounds(0, size, content.len());
        return (Err(DispatchFailure::new(0, err)), content);
    }

    let mut progress = Progress::new(manager.idle_attempt_limit());
    let mut content = content;
    let mut offset = 0;

    while offset < size {
        let attempt = progress.begin();
        trace!(attempt, offset, remaining = size - offset, "write attempt");

        let event = Event::write(
            channel.clone(),
            content,
            offset,
            size - offset,
            context.clone(),
        );

        let (outcome, buffer, _) = manager.submit(event).await.into_parts();
        content = buffer;

        match outcome {
            Ok(0) => {
                if let Err(err) = progress.idle() {
                    return (Err(DispatchFailure::new(attempt, err)), content);
                }

                yield_now().await;
            }
            Ok(n) => {
                progress.advanced();
                offset += n;
            }
            Err(err) => return (Err(DispatchFailure::new(attempt, err)), content),
        }
    }

    (Ok(offset), content)
}

/// Fills `content[offset..]` from `channel`.
///
/// Issues read events for the unfilled suffix until the buffer is full or
/// the channel reports end-of-stream, whichever comes first. A short read
/// caused by end-of-stream is a success. Returns the final cumulative
/// offset, i.e. `offset` plus the number of bytes placed in the buffer.
///
/// # Errors
///
/// - [`EventError::Bounds`] (attempt `0`) if `offset > content.len()`; no
///   event is issued.
/// - The error of the first failing attempt. Bytes read by earlier attempts
///   are not reported, although they remain in the returned buffer.
/// - [`EventError::Stalled`] if too many consecutive attempts read nothing
///   while the channel is not at end-of-stream.
pub async fn read_full<T>(
    manager: &EventManagerHandle,
    channel: &SharedChannel,
    content: Vec<u8>,
    offset: usize,
    context: &EventContext<T>,
) -> BufResult<usize>
where
    T: Send + Sync + 'static,
{
    if offset > content.len() {
        let err = EventError::bounds(offset, 0, content.len());
        return (Err(DispatchFailure::new(0, err)), content);
    }

    let mut progress = Progress::new(manager.idle_attempt_limit());
    let mut content = content;
    let mut offset = offset;

    while offset < content.len() && !channel.has_reached_end() {
        let attempt = progress.begin();
        trace!(attempt, offset, remaining = content.len() - offset, "read attempt");

        let event = Event::read(channel.clone(), content, offset, context.clone());

        let (outcome, buffer, _) = manager.submit(event).await.into_parts();
        content = buffer;

        match outcome {
            Ok(0) => {
                if channel.has_reached_end() {
                    break;
                }

                if let Err(err) = progress.idle() {
                    return (Err(DispatchFailure::new(attempt, err)), content);
                }

                yield_now().await;
            }
            Ok(n) => {
                progress.advanced();
                offset += n;
            }
            Err(err) => return (Err(DispatchFailure::new(attempt, err)), content),
        }
    }

    (Ok(offset), content)
}

/// Attempt bookkeeping of one full transfer.
struct Progress {
    /// Attempts issued so far.
    attempts: usize,

    /// Consecutive attempts that transferred nothing.
    idle: usize,

    /// Maximum tolerated value of `idle`.
    limit: Option<usize>,
}

impl Progress {
    fn new(limit: Option<usize>) -> Self {
        Self {
            attempts: 0,
            idle: 0,
            limit,
        }
    }

    /// Starts a new attempt and returns its 1-based number.
    fn begin(&mut self) -> usize {
        self.attempts += 1;
        self.attempts
    }

    fn advanced(&mut self) {
        self.idle = 0;
    }

    /// Records a zero-progress attempt.
    fn idle(&mut self) -> Result<(), EventError> {
        self.idle += 1;

        match self.limit {
            Some(limit) if self.idle >= limit => {
                warn!(attempts = self.idle, "transfer stalled");
                Err(EventError::Stalled {
                    attempts: self.idle,
                })
            }
            _ => Ok(()),
        }
    }
}
