//! # Eventus
//!
//! **Eventus** is an asynchronous I/O completion engine for byte channels.
//!
//! Callers describe a single transfer (read into, or write from, a region of
//! a buffer) as an [`Event`] and hand it to an [`EventManager`]. A pool of
//! dispatch threads performs exactly one transfer attempt per event and
//! delivers the outcome through an [`EventHandle`], a future that can also be
//! waited on synchronously.
//!
//! On top of single events, [`write_full`] and [`read_full`] loop until the
//! whole request is transferred or the channel reaches end-of-stream,
//! suspending the calling task between attempts instead of blocking a
//! thread. Those callers run on the cooperative [`Runtime`] shipped with the
//! crate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use eventus::{EventContext, EventManager, SharedChannel, StreamChannel, read_full};
//! use std::io::Cursor;
//! use std::sync::Arc;
//!
//! #[eventus::main]
//! async fn main() {
//!     let manager = EventManager::new();
//!     let channel: SharedChannel = Arc::new(StreamChannel::new(Cursor::new(b"hello".to_vec())));
//!
//!     let (read, buffer) = read_full(&manager, &channel, vec![0; 5], 0, &EventContext::new(())).await;
//!     assert_eq!(read.unwrap(), 5);
//!     assert_eq!(buffer, b"hello");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`channel`]: the byte channel abstraction and a `Read + Write` adapter
//! - [`io`]: full reads and full writes
//! - [`time`]: sleep and timeout, used to bound transfers from the outside
//! - [`task`]: spawning tasks on the runtime

mod error;
mod event;
mod manager;
mod runtime;
mod utils;

pub mod channel;
pub mod io;
pub mod time;

pub use channel::{Channel, SharedChannel, StreamChannel};
pub use error::{DispatchFailure, EventError};
pub use event::{Event, EventContext, EventHandle, EventKind, EventResult};
pub use io::{BufResult, read_full, write_full};
pub use manager::{EventManager, EventManagerBuilder, EventManagerHandle};
pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;

pub use eventus_macros::{main, test};
