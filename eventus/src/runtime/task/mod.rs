//! Asynchronous tasks.
//!
//! Tasks are the futures the runtime executor drives, typically callers of
//! [`read_full`](crate::io::read_full) and
//! [`write_full`](crate::io::write_full) suspended on an event handle.
//!
//! Most users interact with this module through [`spawn`] and the
//! [`JoinHandle`] it returns.

mod core;
mod handle;
mod state;

pub(crate) use self::core::{Runnable, spawn_on};

pub use self::core::spawn;
pub use handle::JoinHandle;
