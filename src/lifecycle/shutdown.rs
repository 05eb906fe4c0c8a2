//! Shutdown coordination.
//!
//! `main` triggers this on SIGINT/SIGTERM. The HTTP server holds a receiver
//! and stops accepting connections when it fires, letting in-flight lookups
//! finish. Tests trigger it directly to stop a spawned service.

use tokio::sync::broadcast;

/// One-shot stop signal for the username service.
///
/// Triggering with no subscribers is a no-op.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of subscribers still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
