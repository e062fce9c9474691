//! Policy-set compilation and authorizer assembly over the resolution caches.
//!
//! Compilation is CPU-bound and runs outside any cache lock. Concurrent
//! callers missing on the same key race to compile and both insert; the
//! insert is idempotent (content-hashed keys make the racing values equal),
//! which keeps the hot path free of per-key coordination.

use crate::hashing::{content_hash, policy_set_hash};
use crate::store::AclCacheStore;
use warden_core::{
    AuthorizerFactory, AuthorizerRef, CompileConfig, CompiledPolicyRef, Error, RawPolicy, Result,
    RuleCompiler,
};

/// Compile a policy set, reusing parsed artifacts by content hash.
///
/// Policies are processed in input order and the output preserves it, since
/// downstream evaluation order decides rule precedence. A parse failure
/// aborts the whole call (no partial output); artifacts compiled before the
/// failure are already cached and will be reused by the next attempt.
pub fn compile_policy_set(
    policies: &[RawPolicy],
    cache: &AclCacheStore,
    compiler: &dyn RuleCompiler,
    config: &CompileConfig,
) -> Result<Vec<CompiledPolicyRef>> {
    let mut compiled = Vec::with_capacity(policies.len());
    for policy in policies {
        let key = content_hash(policy);
        if let Some(entry) = cache.get_parsed_policy(&key) {
            // Content-hashed, so the entry cannot be stale.
            compiled.push(entry.into_value());
            continue;
        }

        log::debug!("compiling policy '{}' ({key})", policy.name);
        let parsed = compiler
            .compile(policy, config)
            .map_err(|source| Error::policy_parse(&policy.name, source))?;

        cache.put_parsed_policy(key, parsed.clone());
        compiled.push(parsed);
    }
    Ok(compiled)
}

/// Resolve a policy set to an authorizer, memoized by the set hash.
///
/// The set hash encodes exact membership, order, and content, so a cache hit
/// needs no age check. On a miss the set is compiled and handed to the
/// authorizer constructor; nothing is cached on either failure path.
pub fn build_authorizer(
    policies: &[RawPolicy],
    cache: &AclCacheStore,
    compiler: &dyn RuleCompiler,
    factory: &dyn AuthorizerFactory,
    config: &CompileConfig,
) -> Result<AuthorizerRef> {
    let key = policy_set_hash(policies);
    if let Some(entry) = cache.get_authorizer(&key) {
        return Ok(entry.into_value());
    }

    let compiled =
        compile_policy_set(policies, cache, compiler, config).map_err(Error::policy_set_parse)?;

    let authorizer = factory
        .construct(&compiled, config)
        .map_err(Error::authorizer_construct)?;

    cache.put_authorizer(key, authorizer.clone());
    Ok(authorizer)
}
