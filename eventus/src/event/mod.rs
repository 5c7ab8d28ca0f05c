//! Single transfer attempts.
//!
//! An [`Event`] is one read or one write against a channel over a region of
//! an owned buffer. Events are submitted to the
//! [`EventManager`](crate::EventManager), which performs the transfer on a
//! dispatch worker and resolves the returned [`EventHandle`] with exactly one
//! [`EventResult`]. The buffer and the [`EventContext`] travel with the event
//! and come back in the result.

mod context;
mod handle;
mod result;

pub(crate) use handle::Completion;

pub use context::EventContext;
pub use handle::EventHandle;
pub use result::EventResult;

use crate::channel::SharedChannel;
use crate::error::EventError;

use std::fmt;
use std::io;

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Bytes flow from the channel into the buffer.
    Read,
    /// Bytes flow from the buffer into the channel.
    Write,
}

/// One attempted transfer bound to a channel, a buffer region and a context.
pub struct Event<T> {
    kind: EventKind,
    channel: SharedChannel,
    buffer: Vec<u8>,
    offset: usize,
    len: usize,
    context: EventContext<T>,
}

impl<T> Event<T> {
    /// Creates a read event filling `buffer[offset..]`.
    ///
    /// The region is checked when the event is submitted, not here.
    pub fn read(
        channel: SharedChannel,
        buffer: Vec<u8>,
        offset: usize,
        context: EventContext<T>,
    ) -> Self {
        let len = buffer.len().saturating_sub(offset);

        Self {
            kind: EventKind::Read,
            channel,
            buffer,
            offset,
            len,
            context,
        }
    }

    /// Creates a write event sending `buffer[offset..offset + len]`.
    ///
    /// The region is checked when the event is submitted, not here.
    pub fn write(
        channel: SharedChannel,
        buffer: Vec<u8>,
        offset: usize,
        len: usize,
        context: EventContext<T>,
    ) -> Self {
        Self {
            kind: EventKind::Write,
            channel,
            buffer,
            offset,
            len,
            context,
        }
    }

    /// Direction of the transfer.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Start of the region inside the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes requested.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the region is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The channel the event targets.
    pub fn channel(&self) -> &SharedChannel {
        &self.channel
    }

    /// The correlation context.
    pub fn context(&self) -> &EventContext<T> {
        &self.context
    }

    /// Checks that the region lies inside the buffer.
    ///
    /// A read region always extends to the end of the buffer, so only its
    /// offset can be out of range.
    pub(crate) fn validate(&self) -> Result<(), EventError> {
        let capacity = self.buffer.len();
        let fits = self.offset <= capacity
            && self
                .offset
                .checked_add(self.len)
                .is_some_and(|end| end <= capacity);

        if fits {
            Ok(())
        } else {
            Err(EventError::bounds(self.offset, self.len, capacity))
        }
    }

    /// Runs the channel primitive over the region.
    ///
    /// Must only be called on a validated event.
    pub(crate) fn perform(&mut self) -> Result<usize, EventError> {
        let range = self.offset..self.offset + self.len;

        let n = match self.kind {
            EventKind::Read => self.channel.read(&mut self.buffer[range])?,
            EventKind::Write => self.channel.write(&self.buffer[range])?,
        };

        if n > self.len {
            return Err(EventError::Transport(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "channel reported {n} bytes for a {} byte region",
                    self.len
                ),
            )));
        }

        Ok(n)
    }

    /// Turns the event into its result, handing back buffer and context.
    pub(crate) fn into_result(self, outcome: Result<usize, EventError>) -> EventResult<T> {
        EventResult::new(self.kind, outcome, self.buffer, self.context)
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("capacity", &self.buffer.len())
            .finish()
    }
}
