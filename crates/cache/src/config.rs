//! Cache sizing configuration.

use serde::{Deserialize, Serialize};

/// Per-kind entry capacities for the resolution caches.
///
/// Each field sizes one sub-cache independently; a value of zero disables
/// that sub-cache, turning its operations into safe no-ops. This lets a
/// deployment switch off caching of particular artifact kinds without code
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheCapacities {
    pub identities: usize,
    pub policies: usize,
    pub parsed_policies: usize,
    pub authorizers: usize,
    pub roles: usize,
}

impl Default for CacheCapacities {
    fn default() -> Self {
        // Identities see the most churn; compiled artifacts are small and
        // heavily reused.
        Self {
            identities: 2048,
            policies: 512,
            parsed_policies: 512,
            authorizers: 1024,
            roles: 512,
        }
    }
}

impl CacheCapacities {
    /// All sub-caches disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            identities: 0,
            policies: 0,
            parsed_policies: 0,
            authorizers: 0,
            roles: 0,
        }
    }

    /// Whether every sub-cache is disabled.
    pub fn is_disabled(&self) -> bool {
        self.identities == 0
            && self.policies == 0
            && self.parsed_policies == 0
            && self.authorizers == 0
            && self.roles == 0
    }
}

/// Builder for cache capacities.
pub struct CacheCapacitiesBuilder {
    capacities: CacheCapacities,
}

impl CacheCapacitiesBuilder {
    /// Start from the default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacities: CacheCapacities::default(),
        }
    }

    /// Set the identity cache capacity.
    #[must_use]
    pub fn with_identities(mut self, capacity: usize) -> Self {
        self.capacities.identities = capacity;
        self
    }

    /// Set the raw policy cache capacity.
    #[must_use]
    pub fn with_policies(mut self, capacity: usize) -> Self {
        self.capacities.policies = capacity;
        self
    }

    /// Set the parsed policy cache capacity.
    #[must_use]
    pub fn with_parsed_policies(mut self, capacity: usize) -> Self {
        self.capacities.parsed_policies = capacity;
        self
    }

    /// Set the authorizer cache capacity.
    #[must_use]
    pub fn with_authorizers(mut self, capacity: usize) -> Self {
        self.capacities.authorizers = capacity;
        self
    }

    /// Set the role cache capacity.
    #[must_use]
    pub fn with_roles(mut self, capacity: usize) -> Self {
        self.capacities.roles = capacity;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> CacheCapacities {
        self.capacities
    }
}

impl Default for CacheCapacitiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
