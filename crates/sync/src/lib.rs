//! Anti-entropy synchronization for cached resolution state.
//!
//! Cached state drifts when updates are missed; this crate keeps it
//! reconciled with the source of truth without letting a whole cluster
//! hammer that source in lockstep:
//!
//! - **`trigger`**: a single-slot, non-blocking signal that coalesces bursts
//!   of resync requests into one wakeup.
//! - **`stagger`**: interval scaling and jitter so retries spread out as the
//!   cluster grows.
//! - **`syncer`**: the full/partial sync loop with staggered retries,
//!   pause/resume, and prompt shutdown.

pub mod stagger;
pub mod syncer;
pub mod trigger;

pub use stagger::{random_stagger, scale_interval};
pub use syncer::{AntiEntropySyncer, SyncConfig, SyncDelegate};
pub use trigger::SyncTrigger;
