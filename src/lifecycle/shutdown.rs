//! Graceful stop for the gateway listener.
//!
//! `main` owns one `Shutdown`; the HTTP server holds a receiver and stops
//! accepting once it fires, letting in-flight relays drain. Tests fire it by
//! dropping their gateway handle.

use tokio::sync::broadcast;

/// Fires once to stop every server subscribed to it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscribed server. Firing twice is harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once the coordinator fires or is dropped.
pub async fn wait_for(mut rx: broadcast::Receiver<()>) {
    // Lagged means a signal was sent; Closed means every sender is gone.
    let _ = rx.recv().await;
}
