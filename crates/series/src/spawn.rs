//! Tokio-backed task spawner.

use futures::future::BoxFuture;
use series_core::TaskSpawner;
use tokio::runtime::Handle;
use tracing::warn;

/// Runs detached tasks on a tokio runtime.
///
/// Without an explicit handle the runtime of the calling task is used. If
/// there is none, the task is dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct TokioSpawner {
    handle: Option<Handle>,
}

impl TokioSpawner {
    /// Spawn on whichever runtime is current at spawn time.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Spawn on a specific runtime.
    #[must_use]
    pub const fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        let handle = match &self.handle {
            Some(handle) => handle.clone(),
            None => match Handle::try_current() {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(error = %e, "No tokio runtime available, dropping background task");
                    return;
                }
            },
        };

        handle.spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_spawns_on_current_runtime() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        TokioSpawner::new().spawn(
            async move {
                let _ = tx.send(42);
            }
            .boxed(),
        );
        assert_eq!(rx.await.unwrap(), 42);
    }

    #[test]
    fn test_without_runtime_drops_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        TokioSpawner::new().spawn(
            async move {
                flag.store(true, Ordering::SeqCst);
            }
            .boxed(),
        );
        assert!(!ran.load(Ordering::SeqCst));
    }
}
