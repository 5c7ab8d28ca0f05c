//! Task executor implementation.
//!
//! This module contains the components that poll spawned tasks:
//! - [`core`]: the executor and its lifecycle,
//! - [`worker`]: the threads pulling tasks from the shared run queue.
//!
//! The executor is a separate thread pool from the event dispatch workers,
//! so tasks suspended on an event never hold a dispatch thread.

pub(crate) mod core;
pub(crate) mod worker;

use crate::runtime::task::Runnable;
use crate::utils::WorkQueue;

use std::sync::Arc;

/// Run queue shared by the executor workers.
pub(crate) type TaskQueue = WorkQueue<Arc<dyn Runnable>>;
