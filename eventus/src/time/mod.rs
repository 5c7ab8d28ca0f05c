//! Time utilities.
//!
//! Timeouts on transfers are layered by the caller; the event manager
//! itself never cancels an event. This module provides:
//! - [`sleep`] for suspending a task until a deadline,
//! - [`timeout`] for bounding how long a future may run.

mod sleep;
mod timeout;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timeout::{Elapsed, Timeout, timeout};
