//! Byte-transfer endpoints.
//!
//! A [`Channel`] is the capability the dispatcher drives: one call moves as
//! many bytes as the transport can take or give right now, and may move fewer
//! than requested. Concrete transports live outside this crate and implement
//! the trait; [`StreamChannel`] adapts any blocking `std::io` stream.

mod stream;

pub use stream::StreamChannel;

use std::io;
use std::sync::Arc;

/// A shared reference to a channel, as carried by events.
pub type SharedChannel = Arc<dyn Channel>;

/// A byte-transfer endpoint that may complete short.
///
/// Channels are invoked from dispatch worker threads, hence the `Send + Sync`
/// bound and the `&self` receivers. The owner of a channel guarantees at most
/// one reader and one writer at a time.
pub trait Channel: Send + Sync {
    /// Writes up to `buffer.len()` bytes and returns how many were taken.
    ///
    /// The returned count is never larger than `buffer.len()`. The call must
    /// return as soon as some progress is made or the transport cannot take
    /// more right now.
    fn write(&self, buffer: &[u8]) -> io::Result<usize>;

    /// Reads into `buffer` and returns how many bytes were placed in it.
    ///
    /// `Ok(0)` while [`has_reached_end`](Self::has_reached_end) is `false`
    /// means no bytes were available yet; callers retry.
    fn read(&self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Returns `true` once the channel can never produce more bytes.
    ///
    /// Once `true`, it stays `true`.
    fn has_reached_end(&self) -> bool;

    /// Returns `false` once the channel has been closed by its owner.
    ///
    /// Events submitted against a closed channel are rejected.
    fn is_open(&self) -> bool {
        true
    }
}
