//! Error types shared by the dispatcher and the completion utilities.
//!
//! [`EventError`] describes why a single event did not produce a byte count.
//! [`DispatchFailure`] is what [`read_full`](crate::io::read_full) and
//! [`write_full`](crate::io::write_full) return when their loop is aborted.

use std::io;

use thiserror::Error;

/// Outcome of an event that did not transfer bytes.
#[derive(Debug, Error)]
pub enum EventError {
    /// The channel primitive reported an unrecoverable condition.
    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),

    /// The event never received a real outcome.
    #[error("dispatch interrupted: {reason}")]
    Interrupted {
        /// Why the event was abandoned.
        reason: &'static str,
    },

    /// The buffer region does not fit inside its backing storage.
    #[error("region {offset}..{end} is out of bounds for a buffer of {capacity} bytes", end = .offset + .len)]
    Bounds {
        /// First byte of the region.
        offset: usize,
        /// Number of bytes in the region.
        len: usize,
        /// Length of the backing buffer.
        capacity: usize,
    },

    /// The channel was closed before the event was submitted.
    #[error("channel is closed")]
    ChannelClosed,

    /// Too many consecutive attempts transferred nothing.
    #[error("no progress after {attempts} consecutive attempts")]
    Stalled {
        /// Number of zero-progress attempts observed in a row.
        attempts: usize,
    },
}

impl EventError {
    pub(crate) fn bounds(offset: usize, len: usize, capacity: usize) -> Self {
        EventError::Bounds {
            offset,
            len,
            capacity,
        }
    }

    /// Returns `true` if the failure came from the channel itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, EventError::Transport(_))
    }

    /// Returns `true` if the event was abandoned without an outcome.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, EventError::Interrupted { .. })
    }
}

/// Failure of a full read or full write.
///
/// The loop stops on the first failing attempt. The number of bytes moved by
/// earlier attempts is not part of this value.
#[derive(Debug, Error)]
#[error("dispatch failed on attempt {attempt}: {cause}")]
pub struct DispatchFailure {
    attempt: usize,
    #[source]
    cause: EventError,
}

impl DispatchFailure {
    pub(crate) fn new(attempt: usize, cause: EventError) -> Self {
        Self { attempt, cause }
    }

    /// Attempt number (1-based) that failed. `0` means the request was
    /// rejected before any event was issued.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// The event error that aborted the loop.
    pub fn cause(&self) -> &EventError {
        &self.cause
    }

    /// Consumes the failure and returns its cause.
    pub fn into_cause(self) -> EventError {
        self.cause
    }
}

impl From<DispatchFailure> for io::Error {
    fn from(failure: DispatchFailure) -> Self {
        let kind = match failure.cause() {
            EventError::Transport(err) => err.kind(),
            EventError::Interrupted { .. } => io::ErrorKind::Interrupted,
            EventError::Bounds { .. } => io::ErrorKind::InvalidInput,
            EventError::ChannelClosed => io::ErrorKind::NotConnected,
            EventError::Stalled { .. } => io::ErrorKind::Other,
        };

        io::Error::new(kind, failure)
    }
}
