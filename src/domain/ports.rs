use crate::core::rules::RuleSet;
use crate::domain::model::{EntityKind, FleetSnapshot};
use crate::utils::error::Result;

/// Produces the read snapshot the serializer works on. The storage layer
/// behind it (ORM, file, fixture) stays external to this crate.
pub trait SnapshotStore {
    fn load(&self) -> Result<FleetSnapshot>;
}

/// Resolves a named endpoint profile to its root entity kind and the
/// exclusion rules scoped to that endpoint.
pub trait RuleSource {
    fn rule_set(&self, profile: &str) -> Result<(EntityKind, RuleSet)>;
}
