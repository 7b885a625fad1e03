//! Shutdown coordination for the gateway.
//!
//! `startup::run` owns one `Shutdown`. `HttpServer::run` holds a receiver and
//! drains in-flight graph queries once the signal task calls `trigger`.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Every subscriber sees a single `()` when the gateway is told to stop.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a coordinator with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Get a receiver that resolves on `trigger`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. A no-op when nobody listens.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of receivers (server loops) still alive.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
