//! Detached background tasks.
//!
//! Pre-fetching runs in tasks nobody awaits. Routing them through a
//! [`TaskSpawner`] keeps the cache independent of a particular runtime and
//! lets tests queue the tasks and run them when they choose.

use futures::future::BoxFuture;
use std::fmt::Debug;

/// Runs futures as detached tasks whose result is discarded.
pub trait TaskSpawner: Send + Sync + Debug {
    /// Schedules `task` to run in the background.
    ///
    /// Must not block the caller waiting for `task`.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}
