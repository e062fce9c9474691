//! Coalescing resync signal.

use tokio::sync::mpsc;
use tokio::sync::Mutex;

/// A single-slot, non-blocking resync signal.
///
/// `trigger` never blocks the caller; while a signal is already pending,
/// further triggers are absorbed into it, so a burst of invalidations wakes
/// the consumer exactly once instead of queuing duplicate work. One consumer
/// awaits `wait`; the primitive is not a broadcast.
#[derive(Debug)]
pub struct SyncTrigger {
    tx: mpsc::Sender<()>,
    rx: Mutex<mpsc::Receiver<()>>,
}

impl SyncTrigger {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Mark a resync as pending. Idempotent until the pending signal is
    /// consumed.
    pub fn trigger(&self) {
        // A full slot means a wakeup is already pending.
        let _ = self.tx.try_send(());
    }

    /// Wait for a pending signal and consume it.
    pub async fn wait(&self) {
        let mut rx = self.rx.lock().await;
        // The sender half lives in self, so recv never yields None.
        let _ = rx.recv().await;
    }
}

impl Default for SyncTrigger {
    fn default() -> Self {
        Self::new()
    }
}
