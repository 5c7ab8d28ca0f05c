//! Cooperative task runtime.
//!
//! Callers of [`read_full`](crate::io::read_full) and
//! [`write_full`](crate::io::write_full) suspend between transfer attempts.
//! This module provides the executor those callers run on:
//! - a multi-threaded executor fed by one shared run queue,
//! - a timer thread backing [`sleep`](crate::time::sleep) and
//!   [`timeout`](crate::time::timeout),
//! - thread-local runtime context so [`task::spawn`] needs no handle,
//! - cooperative yielding via [`yield_now`](yield_now::yield_now).

mod core;
mod executor;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod timer;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
