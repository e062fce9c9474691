//! End-to-end coverage of the compile-and-cache flow with counting mocks for
//! the external compiler and constructor primitives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warden_cache::{
    build_authorizer, compile_policy_set, content_hash, policy_set_hash, AclCacheStore,
    CacheCapacitiesBuilder,
};
use warden_core::{
    AccessDecision, Authorizer, AuthorizerFactory, AuthorizerRef, BoxedError, CompileConfig,
    CompiledPolicy, CompiledPolicyRef, RawPolicy, RuleCompiler,
};

struct ParsedStub {
    name: String,
}

impl CompiledPolicy for ParsedStub {
    fn name(&self) -> &str {
        &self.name
    }
}

struct AllowAll;

impl Authorizer for AllowAll {
    fn decide(&self, _resource: &str, _action: &str) -> AccessDecision {
        AccessDecision::Allow
    }
}

/// Counts compile calls; rejects any policy whose rules contain "bogus".
#[derive(Default)]
struct CountingCompiler {
    calls: AtomicUsize,
}

impl CountingCompiler {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RuleCompiler for CountingCompiler {
    fn compile(
        &self,
        policy: &RawPolicy,
        _config: &CompileConfig,
    ) -> Result<CompiledPolicyRef, BoxedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if policy.rules.contains("bogus") {
            return Err("unexpected token \"bogus\"".into());
        }
        Ok(Arc::new(ParsedStub {
            name: policy.name.clone(),
        }))
    }
}

/// Counts construct calls; always succeeds.
#[derive(Default)]
struct CountingFactory {
    calls: AtomicUsize,
}

impl CountingFactory {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AuthorizerFactory for CountingFactory {
    fn construct(
        &self,
        _policies: &[CompiledPolicyRef],
        _config: &CompileConfig,
    ) -> Result<AuthorizerRef, BoxedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(AllowAll))
    }
}

fn store() -> AclCacheStore {
    let caps = CacheCapacitiesBuilder::new()
        .with_parsed_policies(10)
        .with_authorizers(10)
        .build();
    AclCacheStore::new(Some(&caps))
}

#[test]
fn test_identical_rules_under_different_ids_compile_once() {
    let cache = store();
    let compiler = CountingCompiler::default();
    let config = CompileConfig::default();

    let p1 = RawPolicy::new("p1", "web-read", "allow all");
    let p2 = RawPolicy::new("p2", "web-read-copy", "allow all");

    compile_policy_set(&[p1], &cache, &compiler, &config).expect("first set compiles");
    compile_policy_set(&[p2], &cache, &compiler, &config).expect("second set compiles");

    assert_eq!(compiler.calls(), 1);
}

#[test]
fn test_compiled_output_preserves_input_order() {
    let cache = store();
    let compiler = CountingCompiler::default();
    let config = CompileConfig::default();

    let deny = RawPolicy::new("p-deny", "deny-db", "deny db");
    let allow = RawPolicy::new("p-allow", "allow-db", "allow db");

    // Warm the cache out of order, then compile in evaluation order.
    compile_policy_set(&[allow.clone()], &cache, &compiler, &config).expect("warmup compiles");
    let compiled = compile_policy_set(&[deny.clone(), allow], &cache, &compiler, &config)
        .expect("full set compiles");

    let names: Vec<&str> = compiled.iter().map(|p| p.name()).collect();
    assert_eq!(names, ["deny-db", "allow-db"]);
}

#[test]
fn test_cached_authorizer_skips_compiler_and_constructor() {
    let cache = store();
    let compiler = CountingCompiler::default();
    let factory = CountingFactory::default();
    let config = CompileConfig::default();

    let policies = [RawPolicy::new("p1", "web-read", "allow all")];
    cache.put_authorizer(policy_set_hash(&policies), Arc::new(AllowAll));

    let authorizer = build_authorizer(&policies, &cache, &compiler, &factory, &config)
        .expect("hit path succeeds");

    assert_eq!(authorizer.decide("web", "read"), AccessDecision::Allow);
    assert_eq!(compiler.calls(), 0);
    assert_eq!(factory.calls(), 0);
}

#[test]
fn test_bad_policy_fails_the_whole_set_but_keeps_earlier_entries() {
    let cache = store();
    let compiler = CountingCompiler::default();
    let config = CompileConfig::default();

    let good1 = RawPolicy::new("g1", "good-one", "allow one");
    let bad = RawPolicy::new("b1", "bad-policy", "bogus rules");
    let good2 = RawPolicy::new("g2", "good-two", "allow two");

    let err = compile_policy_set(
        &[good1.clone(), bad.clone(), good2.clone()],
        &cache,
        &compiler,
        &config,
    )
    .expect_err("bad policy aborts the set");

    assert!(err.to_string().contains("bad-policy"));
    // good1 was compiled and cached before the failure; good2 never ran.
    assert_eq!(compiler.calls(), 2);
    assert!(cache.get_parsed_policy(&content_hash(&good1)).is_some());
    assert!(cache.get_parsed_policy(&content_hash(&bad)).is_none());
    assert!(cache.get_parsed_policy(&content_hash(&good2)).is_none());
}

#[test]
fn test_build_failure_caches_nothing_for_the_set() {
    let cache = store();
    let compiler = CountingCompiler::default();
    let factory = CountingFactory::default();
    let config = CompileConfig::default();

    let policies = [RawPolicy::new("b1", "bad-policy", "bogus rules")];
    let err = build_authorizer(&policies, &cache, &compiler, &factory, &config)
        .expect_err("parse failure propagates");

    assert!(err.to_string().contains("failed to parse the ACL policies"));
    assert!(err.to_string().contains("bad-policy"));
    assert_eq!(factory.calls(), 0);
    assert!(cache.get_authorizer(&policy_set_hash(&policies)).is_none());
}

#[test]
fn test_renamed_policy_reuses_parse_but_not_authorizer() {
    let cache = store();
    let compiler = CountingCompiler::default();
    let factory = CountingFactory::default();
    let config = CompileConfig::default();

    let first = [RawPolicy::new("p1", "web-read", "allow all")];
    build_authorizer(&first, &cache, &compiler, &factory, &config).expect("first build succeeds");

    assert_eq!(compiler.calls(), 1);
    assert_eq!(factory.calls(), 1);
    assert!(cache.get_authorizer(&policy_set_hash(&first)).is_some());

    // Same rule text under a new logical ID: the parsed-policy entry is
    // shared, the set hash is not.
    let renamed = [RawPolicy::new("p1-renamed", "web-read", "allow all")];
    build_authorizer(&renamed, &cache, &compiler, &factory, &config)
        .expect("renamed build succeeds");

    assert_eq!(compiler.calls(), 1);
    assert_eq!(factory.calls(), 2);
    assert!(cache.get_authorizer(&policy_set_hash(&renamed)).is_some());

    // A repeat of either set is now a pure cache hit.
    build_authorizer(&first, &cache, &compiler, &factory, &config).expect("repeat hit succeeds");
    assert_eq!(compiler.calls(), 1);
    assert_eq!(factory.calls(), 2);
}

#[test]
fn test_disabled_store_still_builds_but_never_memoizes() {
    let cache = AclCacheStore::disabled();
    let compiler = CountingCompiler::default();
    let factory = CountingFactory::default();
    let config = CompileConfig::default();

    let policies = [RawPolicy::new("p1", "web-read", "allow all")];
    build_authorizer(&policies, &cache, &compiler, &factory, &config).expect("first build");
    build_authorizer(&policies, &cache, &compiler, &factory, &config).expect("second build");

    assert_eq!(compiler.calls(), 2);
    assert_eq!(factory.calls(), 2);
}
