//! Domain records and trait seams for the resolution layer.
//!
//! The structs here are the payloads the caches hold; the traits are the
//! in-process contracts with the external rule compiler, the authorizer
//! constructor, and the authorizer itself. Compiled artifacts cross those
//! seams as shared trait objects so the cache never learns their concrete
//! shape.

use crate::errors::BoxedError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Syntax dialect of a policy's rule source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxDialect {
    /// Pre-migration rule grammar, still accepted from old control planes.
    Legacy,
    /// The grammar current deployments emit.
    #[default]
    Current,
}

impl SyntaxDialect {
    /// Stable byte tag used when the dialect participates in a digest.
    #[must_use]
    pub fn as_tag(&self) -> &'static [u8] {
        match self {
            SyntaxDialect::Legacy => b"legacy",
            SyntaxDialect::Current => b"current",
        }
    }
}

/// Tenancy qualifiers that change how a policy's rules are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnterpriseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl EnterpriseMeta {
    /// Qualifiers scoped to a partition and namespace.
    #[must_use]
    pub fn scoped(partition: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            partition: Some(partition.into()),
            namespace: Some(namespace.into()),
        }
    }
}

/// A raw policy record as delivered by the surrounding resolution logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPolicy {
    /// Logical ID assigned by the control plane.
    pub id: String,
    /// Human-readable name, used in parse errors.
    pub name: String,
    /// Rule source text, uncompiled.
    pub rules: String,
    #[serde(default)]
    pub dialect: SyntaxDialect,
    #[serde(default)]
    pub meta: EnterpriseMeta,
}

impl RawPolicy {
    /// Convenience constructor for a policy in the current dialect with no
    /// tenancy qualifiers.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, rules: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rules: rules.into(),
            dialect: SyntaxDialect::default(),
            meta: EnterpriseMeta::default(),
        }
    }
}

/// A resolved identity: the principal plus its policy and role links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub policy_ids: Vec<String>,
    #[serde(default)]
    pub role_ids: Vec<String>,
}

/// A role groups policies under a stable logical ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub policy_ids: Vec<String>,
}

/// Settings handed through to the rule compiler and authorizer constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileConfig {
    /// Tenancy defaults applied when a policy carries none of its own.
    pub default_meta: EnterpriseMeta,
}

/// Access decision produced by an authorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
    /// No rule matched; the caller's default policy applies.
    Default,
}

/// A compiled, ready-to-evaluate policy artifact.
///
/// Produced by the rule compiler and consumed by the authorizer constructor;
/// the cache stores it as an opaque shared handle keyed by content hash.
pub trait CompiledPolicy: Send + Sync {
    /// Name of the policy this artifact was compiled from.
    fn name(&self) -> &str;
}

/// Shared handle to a compiled policy.
pub type CompiledPolicyRef = Arc<dyn CompiledPolicy>;

/// A compiled access-control decision object.
pub trait Authorizer: Send + Sync {
    /// Evaluate an access request for a resource and action.
    fn decide(&self, resource: &str, action: &str) -> AccessDecision;
}

/// Shared handle to an authorizer.
pub type AuthorizerRef = Arc<dyn Authorizer>;

/// External rule-compiler primitive.
pub trait RuleCompiler: Send + Sync {
    /// Compile one policy's rule source into an evaluatable artifact.
    fn compile(
        &self,
        policy: &RawPolicy,
        config: &CompileConfig,
    ) -> std::result::Result<CompiledPolicyRef, BoxedError>;
}

/// External authorizer-construction primitive.
pub trait AuthorizerFactory: Send + Sync {
    /// Assemble compiled policies, in evaluation order, into an authorizer.
    fn construct(
        &self,
        policies: &[CompiledPolicyRef],
        config: &CompileConfig,
    ) -> std::result::Result<AuthorizerRef, BoxedError>;
}
