use super::{EventContext, EventKind};
use crate::error::EventError;

/// The outcome of one event.
///
/// Produced exactly once per submitted event. Besides the transferred byte
/// count (or the failure), it returns ownership of the buffer and the
/// context to the submitter.
#[derive(Debug)]
pub struct EventResult<T> {
    kind: EventKind,
    outcome: Result<usize, EventError>,
    buffer: Vec<u8>,
    context: EventContext<T>,
}

impl<T> EventResult<T> {
    pub(crate) fn new(
        kind: EventKind,
        outcome: Result<usize, EventError>,
        buffer: Vec<u8>,
        context: EventContext<T>,
    ) -> Self {
        Self {
            kind,
            outcome,
            buffer,
            context,
        }
    }

    /// Direction of the event this result belongs to.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Bytes transferred by this attempt, or why it failed.
    pub fn outcome(&self) -> Result<usize, &EventError> {
        self.outcome.as_ref().copied()
    }

    /// Returns `true` if the attempt transferred bytes (possibly zero)
    /// without failing.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The buffer the event operated on.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The context the event was submitted with.
    pub fn context(&self) -> &EventContext<T> {
        &self.context
    }

    /// Splits the result into outcome, buffer and context.
    pub fn into_parts(self) -> (Result<usize, EventError>, Vec<u8>, EventContext<T>) {
        (self.outcome, self.buffer, self.context)
    }
}
