use super::Channel;

use std::io::{self, Read, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A [`Channel`] over any `std::io` stream.
///
/// `StreamChannel` lets readers and writers from the standard library
/// (files, pipes, sockets, cursors) be driven by the dispatcher. The stream
/// is guarded by a mutex since dispatch workers share the channel.
///
/// Mapping of stream results:
/// - `Ok(0)` from a read into a non-empty buffer latches end-of-stream,
/// - `Ok(0)` from a write of a non-empty buffer is a `WriteZero` error, as
///   in [`Write::write_all`],
/// - `WouldBlock` is reported as zero progress,
/// - `Interrupted` is retried in place,
/// - any other error is returned as is.
///
/// # Examples
///
/// ```rust,ignore
/// let channel = Arc::new(StreamChannel::new(Cursor::new(b"hello".to_vec())));
/// ```
pub struct StreamChannel<S> {
    /// The wrapped stream.
    stream: Mutex<S>,

    /// Set once a read observed the end of the stream.
    eof: AtomicBool,

    /// Cleared by [`close`](Self::close).
    open: AtomicBool,
}

impl<S> StreamChannel<S> {
    /// Wraps `stream` into an open channel.
    pub fn new(stream: S) -> Self {
        Self {
            stream: Mutex::new(stream),
            eof: AtomicBool::new(false),
            open: AtomicBool::new(true),
        }
    }

    /// Marks the channel as closed. Events submitted afterwards are rejected.
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> S {
        self.stream
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, S>> {
        self.stream
            .lock()
            .map_err(|_| io::Error::other("stream lock poisoned"))
    }
}

impl<S> Channel for StreamChannel<S>
where
    S: Read + Write + Send,
{
    fn write(&self, buffer: &[u8]) -> io::Result<usize> {
        let mut stream = self.lock()?;

        loop {
            match stream.write(buffer) {
                Ok(0) if !buffer.is_empty() => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "stream accepted no bytes",
                    ));
                }
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(0),
                Err(e) => return Err(e),
            }
        }
    }

    fn read(&self, buffer: &mut [u8]) -> io::Result<usize> {
        if self.eof.load(Ordering::Acquire) {
            return Ok(0);
        }

        let mut stream = self.lock()?;

        loop {
            match stream.read(buffer) {
                Ok(0) if !buffer.is_empty() => {
                    self.eof.store(true, Ordering::Release);
                    return Ok(0);
                }
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(0),
                Err(e) => return Err(e),
            }
        }
    }

    fn has_reached_end(&self) -> bool {
        self.eof.load(Ordering::Acquire)
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}
