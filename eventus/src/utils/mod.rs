//! Low-level building blocks shared by the runtime and the dispatcher.
//!
//! This module provides the [`WorkQueue`] both thread pools of the crate pull
//! their work from: the task executor and the event dispatch workers.

mod queue;

pub(crate) use queue::WorkQueue;
