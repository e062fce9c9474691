//! Resolution caches for compiled access-control artifacts.
//!
//! This crate turns raw ACL policies into compiled authorizers while making
//! sure identical content is never compiled twice:
//!
//! - Content-addressed keys: parsed policies are keyed by a digest of their
//!   rule source, authorizers by a digest of the whole policy set, so a
//!   renamed-but-identical policy reuses the existing compiled entry.
//! - Bounded memory: each sub-cache is a fixed-capacity LRU; hot compiled
//!   artifacts stay resident, cold ones fall out under pressure.
//! - Concurrent access: lookups and insertions are short critical sections;
//!   compilation runs outside any cache-wide lock.

pub mod bounded;
pub mod compile;
pub mod config;
pub mod entry;
pub mod hashing;
pub mod store;

pub use bounded::BoundedCache;
pub use compile::{build_authorizer, compile_policy_set};
pub use config::{CacheCapacities, CacheCapacitiesBuilder};
pub use entry::{CacheEntry, CacheStats};
pub use hashing::{content_hash, policy_set_hash, ContentHash, SetHash};
pub use store::{AclCacheStore, StoreStats};
