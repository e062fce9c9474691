//! Content and set digests used as cache keys.
//!
//! Both digests are deterministic across process restarts: independent
//! processes observing the same policy content derive the same keys, even
//! though each process keeps its own cache.

use sha2::{Digest, Sha256};
use std::fmt;
use warden_core::RawPolicy;

/// Hex digest of a single policy's meaningful content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex digest identifying an ordered policy set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetHash(String);

impl SetHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Length-prefix each field so adjacent fields cannot run together and
// collide ("ab" + "" vs "a" + "b").
fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

/// Digest the content that affects a policy's interpretation: rule source,
/// dialect, and tenancy qualifiers.
///
/// Logical identity is deliberately left out, so a renamed policy with
/// byte-identical rules maps to the same parsed-policy entry.
#[must_use]
pub fn content_hash(policy: &RawPolicy) -> ContentHash {
    let mut hasher = Sha256::new();
    update_field(&mut hasher, policy.rules.as_bytes());
    update_field(&mut hasher, policy.dialect.as_tag());
    update_field(
        &mut hasher,
        policy.meta.partition.as_deref().unwrap_or("").as_bytes(),
    );
    update_field(
        &mut hasher,
        policy.meta.namespace.as_deref().unwrap_or("").as_bytes(),
    );
    ContentHash(format!("{:x}", hasher.finalize()))
}

/// Digest an ordered policy set into an authorizer cache key.
///
/// Each member contributes its logical ID and its content hash, in input
/// order. Evaluation order carries deny-precedence semantics downstream, so
/// differently ordered sets must not collapse to one key; including the ID
/// keeps sets with distinct membership apart even when their rule text
/// coincides.
#[must_use]
pub fn policy_set_hash(policies: &[RawPolicy]) -> SetHash {
    let mut hasher = Sha256::new();
    for policy in policies {
        update_field(&mut hasher, policy.id.as_bytes());
        update_field(&mut hasher, content_hash(policy).as_str().as_bytes());
    }
    SetHash(format!("{:x}", hasher.finalize()))
}
