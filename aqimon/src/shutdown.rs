//! Cooperative shutdown controller.
//!
//! Shared by the HTTP server and the sampling loop. `server.rs` combines it
//! with OS signals; tests trigger it directly to stop the loop after a bounded
//! number of ticks.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;

/// Cooperative shutdown signal.
#[derive(Clone, Debug, Default)]
pub struct ShutdownController {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownController {
    /// Returns true if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// Request shutdown and wake all waiters.
    pub fn request_shutdown(&self) {
        self.inner.requested.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Wait until shutdown is requested.
    ///
    /// The waiter is registered before the flag is checked, so a request that
    /// lands between the check and the await is never missed.
    pub async fn wait(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_returns_immediately_when_already_requested() {
        let shutdown = ShutdownController::default();
        shutdown.request_shutdown();

        tokio::time::timeout(Duration::from_millis(100), shutdown.wait())
            .await
            .expect("wait should not block after shutdown was requested");
    }

    #[tokio::test]
    async fn wait_wakes_all_clones() {
        let shutdown = ShutdownController::default();
        let a = tokio::spawn({
            let s = shutdown.clone();
            async move { s.wait().await }
        });
        let b = tokio::spawn({
            let s = shutdown.clone();
            async move { s.wait().await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.request_shutdown();

        tokio::time::timeout(Duration::from_secs(2), async {
            a.await.unwrap();
            b.await.unwrap();
        })
        .await
        .expect("waiters were not woken");
        assert!(shutdown.is_shutdown_requested());
    }
}
