//! services/api/src/tasks/mod.rs
//!
//! Background timers that keep the database and the host awake.

pub mod keep_alive;
pub mod self_ping;

pub use keep_alive::{KeepAliveScheduler, RecoveryOutcome};
pub use self_ping::{PingOutcome, SelfPingScheduler};

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Spawned timer loops sharing one cancellation token.
///
/// `begin` claims the set and `stop` cancels every pending wait, joins the
/// loops and arms a fresh token, so a stopped set can be started again.
/// Calling `stop` twice is a no-op.
#[derive(Default)]
pub(crate) struct TaskSet {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    shutdown: CancellationToken,
    running: bool,
    handles: Vec<JoinHandle<()>>,
}

impl TaskSet {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the set running and hands out the token for its loops, or `None`
    /// when it is already running.
    pub(crate) fn begin(&self) -> Option<CancellationToken> {
        let mut inner = self.lock();
        if inner.running {
            return None;
        }
        inner.running = true;
        Some(inner.shutdown.clone())
    }

    /// The token of the current run.
    pub(crate) fn token(&self) -> CancellationToken {
        self.lock().shutdown.clone()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.lock().running
    }

    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.lock().handles.push(tokio::spawn(task));
    }

    pub(crate) async fn stop(&self) {
        let (shutdown, handles) = {
            let mut inner = self.lock();
            inner.running = false;
            (
                std::mem::take(&mut inner.shutdown),
                std::mem::take(&mut inner.handles),
            )
        };
        shutdown.cancel();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Background task ended abnormally");
            }
        }
    }
}
