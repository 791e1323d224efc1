//! Graceful shutdown signal.

use tokio::sync::broadcast;

/// Fans a single shutdown trigger out to the scheduler's background jobs.
///
/// Jobs subscribe before they start and select on the receiver between
/// cycles, so an in-flight cycle always runs to completion before its loop
/// exits.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Obtain a receiver for one background job.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscribed job to finish its current work and exit.
    pub fn trigger(&self) {
        // Send only fails with no subscribers, which is a valid state
        // (e.g. run-once mode never starts the scheduler).
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_reaches_all_subscribers() {
        let shutdown = Shutdown::new();
        let mut first = shutdown.subscribe();
        let mut second = shutdown.subscribe();

        shutdown.trigger();

        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[test]
    fn trigger_without_subscribers_is_harmless() {
        Shutdown::new().trigger();
    }
}
