//! The ACL resolution cache store.

use crate::bounded::BoundedCache;
use crate::config::CacheCapacities;
use crate::entry::{CacheEntry, CacheStats};
use crate::hashing::{ContentHash, SetHash};
use std::sync::Arc;
use std::time::Duration;
use warden_core::{AuthorizerRef, CompiledPolicyRef, Identity, RawPolicy, Role};

/// Owns the five bounded caches backing ACL resolution.
///
/// Identity, policy, and role entries are keyed by logical ID and removed
/// explicitly when the source of truth changes. Parsed policies and
/// authorizers are keyed by content digests: changed content simply becomes
/// a new key, so those caches are never invalidated explicitly and only shed
/// entries under capacity pressure.
///
/// Every method is safe to call on a fully disabled store (each sub-cache
/// reports misses and swallows mutations), so callers can hold an optional
/// cache without branching at each call site. No component outside this
/// store touches the underlying caches directly.
pub struct AclCacheStore {
    identities: BoundedCache<String, Arc<Identity>>,
    policies: BoundedCache<String, Arc<RawPolicy>>,
    parsed_policies: BoundedCache<ContentHash, CompiledPolicyRef>,
    authorizers: BoundedCache<SetHash, AuthorizerRef>,
    roles: BoundedCache<String, Arc<Role>>,
}

/// Per-kind counter snapshot for operator introspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub identities: CacheStats,
    pub policies: CacheStats,
    pub parsed_policies: CacheStats,
    pub authorizers: CacheStats,
    pub roles: CacheStats,
}

impl AclCacheStore {
    /// Build a store from the given capacities. `None` disables everything.
    #[must_use]
    pub fn new(capacities: Option<&CacheCapacities>) -> Self {
        let caps = capacities.copied().unwrap_or_else(CacheCapacities::disabled);
        if caps.is_disabled() {
            log::debug!("ACL resolution caching disabled");
        }
        Self {
            identities: BoundedCache::new(caps.identities),
            policies: BoundedCache::new(caps.policies),
            parsed_policies: BoundedCache::new(caps.parsed_policies),
            authorizers: BoundedCache::new(caps.authorizers),
            roles: BoundedCache::new(caps.roles),
        }
    }

    /// A store on which every operation is a safe no-op.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(None)
    }

    // Identities

    pub fn get_identity(&self, id: &str) -> Option<CacheEntry<Arc<Identity>>> {
        self.identities.get(id)
    }

    pub fn put_identity(&self, id: impl Into<String>, identity: Identity) {
        self.identities.put(id.into(), Arc::new(identity));
    }

    pub fn remove_identity(&self, id: &str) {
        self.identities.remove(id);
    }

    // Raw policies

    pub fn get_policy(&self, id: &str) -> Option<CacheEntry<Arc<RawPolicy>>> {
        self.policies.get(id)
    }

    pub fn put_policy(&self, id: impl Into<String>, policy: RawPolicy) {
        self.policies.put(id.into(), Arc::new(policy));
    }

    pub fn remove_policy(&self, id: &str) {
        self.policies.remove(id);
    }

    // Parsed policies, keyed by content hash. No removal by logical ID:
    // changed content lands under a fresh key and the old entry ages out.

    pub fn get_parsed_policy(&self, hash: &ContentHash) -> Option<CacheEntry<CompiledPolicyRef>> {
        self.parsed_policies.get(hash)
    }

    pub fn put_parsed_policy(&self, hash: ContentHash, policy: CompiledPolicyRef) {
        self.parsed_policies.put(hash, policy);
    }

    // Authorizers, keyed by policy-set hash.

    pub fn get_authorizer(&self, hash: &SetHash) -> Option<CacheEntry<AuthorizerRef>> {
        self.authorizers.get(hash)
    }

    pub fn put_authorizer(&self, hash: SetHash, authorizer: AuthorizerRef) {
        self.authorizers.put(hash, authorizer);
    }

    /// Insert an authorizer with an advisory ttl. The ttl is recorded on the
    /// entry for introspection but never enforced.
    pub fn put_authorizer_with_ttl(&self, hash: SetHash, authorizer: AuthorizerRef, ttl: Duration) {
        self.authorizers.put_with_ttl(hash, authorizer, Some(ttl));
    }

    // Roles

    pub fn get_role(&self, id: &str) -> Option<CacheEntry<Arc<Role>>> {
        self.roles.get(id)
    }

    pub fn put_role(&self, id: impl Into<String>, role: Role) {
        self.roles.put(id.into(), Arc::new(role));
    }

    pub fn remove_role(&self, id: &str) {
        self.roles.remove(id);
    }

    /// Drop every entry in all five sub-caches. Used on cold start and on a
    /// catastrophic resync.
    pub fn purge(&self) {
        self.identities.purge();
        self.policies.purge();
        self.parsed_policies.purge();
        self.authorizers.purge();
        self.roles.purge();
    }

    /// Counter snapshot across all sub-caches.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            identities: self.identities.stats(),
            policies: self.policies.stats(),
            parsed_policies: self.parsed_policies.stats(),
            authorizers: self.authorizers.stats(),
            roles: self.roles.stats(),
        }
    }
}

impl Default for AclCacheStore {
    fn default() -> Self {
        Self::disabled()
    }
}
