//! Staggered anti-entropy loop reconciling cached state with the source of
//! truth.

use crate::stagger::{random_stagger, scale_interval};
use crate::trigger::SyncTrigger;
use async_trait::async_trait;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::warn;
use warden_core::Result;

/// Reconciliation operations the syncer drives against the source of truth.
#[async_trait]
pub trait SyncDelegate: Send + Sync {
    /// Current cluster membership count, used to stretch retry stagger.
    fn cluster_size(&self) -> usize;

    /// Reconcile all local state with the source of truth.
    async fn full_sync(&self) -> Result<()>;

    /// Push accumulated local changes.
    async fn partial_sync(&self) -> Result<()>;
}

/// Timing knobs for the sync loop.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base period between unprompted full syncs.
    pub full_sync_interval: Duration,
    /// Base delay before honoring an out-of-band full-sync trigger.
    pub stagger_interval: Duration,
    /// Base delay before retrying a failed full sync.
    pub retry_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            full_sync_interval: Duration::from_secs(60),
            stagger_interval: Duration::from_secs(3),
            retry_interval: Duration::from_secs(15),
        }
    }
}

/// Background reconciler with coalesced triggers and pause support.
///
/// The loop alternates between two states: establishing a full sync (retried
/// with staggered backoff until it lands) and steady-state partial syncing,
/// interrupted by a periodic full resync, an explicit full-sync trigger, or
/// shutdown. Every delay is jittered and scaled to the cluster size so the
/// members of a large cluster do not hit the source of truth in lockstep.
///
/// The syncer is constructed and owned by whoever starts it; anything that
/// needs to request a resync holds a clone of the owning `Arc`.
pub struct AntiEntropySyncer<D> {
    config: SyncConfig,
    delegate: D,
    paused: AtomicI32,
    full_sync: SyncTrigger,
    partial_sync: SyncTrigger,
}

impl<D: SyncDelegate> AntiEntropySyncer<D> {
    pub fn new(config: SyncConfig, delegate: D) -> Self {
        Self {
            config,
            delegate,
            paused: AtomicI32::new(0),
            full_sync: SyncTrigger::new(),
            partial_sync: SyncTrigger::new(),
        }
    }

    /// Request an out-of-band full resync, e.g. after the source of truth
    /// failed over. Coalesces; never blocks.
    pub fn trigger_full_sync(&self) {
        self.full_sync.trigger();
    }

    /// Signal that local state changed and should be pushed.
    pub fn trigger_partial_sync(&self) {
        self.partial_sync.trigger();
    }

    /// Suspend partial syncs, e.g. around a batch of local changes. Nested:
    /// every `pause` needs a matching [`resume`](Self::resume).
    pub fn pause(&self) {
        self.paused.fetch_add(1, Ordering::SeqCst);
    }

    /// Undo one [`pause`](Self::pause) and schedule a partial sync to pick
    /// up changes made in the meantime.
    ///
    /// # Panics
    ///
    /// Panics when called without a matching `pause`; continuing past an
    /// unbalanced caller would silently desynchronize state.
    pub fn resume(&self) {
        let paused = self.paused.fetch_sub(1, Ordering::SeqCst) - 1;
        if paused < 0 {
            panic!("unbalanced AntiEntropySyncer::resume() detected");
        }
        self.trigger_partial_sync();
    }

    /// Whether partial syncs are currently suspended.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst) > 0
    }

    /// Drive the sync loop until `shutdown` flips to true or its sender is
    /// dropped. Every wait point honors the shutdown signal.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            // Establish a full sync, retrying with staggered backoff.
            loop {
                if *shutdown.borrow() {
                    return;
                }
                match self.delegate.full_sync().await {
                    Ok(()) => break,
                    Err(err) => warn!(error = %err, "full sync failed"),
                }

                let size = self.delegate.cluster_size();
                let retry_delay = self.config.retry_interval
                    + random_stagger(scale_interval(self.config.retry_interval, size));
                tokio::select! {
                    _ = self.full_sync.wait() => {
                        // The source of truth came (back) up; spread the
                        // herd of waiting members before retrying.
                        if self.staggered_delay(size, &mut shutdown).await {
                            return;
                        }
                    }
                    _ = sleep(retry_delay) => {}
                    _ = shutdown.changed() => return,
                }
            }

            // Pick up changes made while the full sync ran.
            self.trigger_partial_sync();

            // Schedule the next unprompted full resync with a random stagger.
            let interval =
                scale_interval(self.config.full_sync_interval, self.delegate.cluster_size());
            let full_resync = sleep(interval + random_stagger(interval));
            tokio::pin!(full_resync);

            loop {
                tokio::select! {
                    _ = &mut full_resync => break,
                    _ = self.full_sync.wait() => {
                        let size = self.delegate.cluster_size();
                        if self.staggered_delay(size, &mut shutdown).await {
                            return;
                        }
                        break;
                    }
                    _ = self.partial_sync.wait() => {
                        if self.is_paused() {
                            // Consumed, deliberately skipped; resume will
                            // re-trigger.
                            continue;
                        }
                        if let Err(err) = self.delegate.partial_sync().await {
                            warn!(error = %err, "partial sync failed");
                        }
                    }
                    _ = shutdown.changed() => return,
                }
            }
        }
    }

    // Returns true when shutdown fired during the delay.
    async fn staggered_delay(
        &self,
        cluster_size: usize,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        let delay = random_stagger(scale_interval(self.config.stagger_interval, cluster_size));
        tokio::select! {
            _ = sleep(delay) => false,
            _ = shutdown.changed() => true,
        }
    }
}
