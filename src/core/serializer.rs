use serde_json::{Map, Value};

use crate::core::rules::RuleSet;
use crate::core::schema::{self, BaselineRules};
use crate::domain::model::{EntityId, EntityKind, EntityNode, FleetSnapshot, Resolved};
use crate::utils::error::{FleetError, Result};

/// Fallback bound only. Rule sets that passed `verify::verify_rules` never
/// get anywhere near it; it catches hand-rolled rule sets that leave a
/// cycle uncut.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Depth-first graph serializer over one read snapshot.
///
/// Traversal is pruned by exclusion paths: the caller's rules are relative
/// to the root record, and the baseline rules of each entity type activate
/// at every node of that type. A relationship is skipped when its candidate
/// path exactly matches an active rule; matching is never prefix-based.
pub struct Serializer<'a> {
    snapshot: &'a FleetSnapshot,
    baselines: BaselineRules,
    max_depth: usize,
}

impl<'a> Serializer<'a> {
    pub fn new(snapshot: &'a FleetSnapshot, baselines: BaselineRules) -> Self {
        Self {
            snapshot,
            baselines,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn snapshot(&self) -> &'a FleetSnapshot {
        self.snapshot
    }

    /// Serialize one record and its reachable relations into a mapping.
    ///
    /// Pure over the snapshot: the same input always yields the same
    /// output. Rules are checked against the schema before any traversal.
    pub fn serialize(&self, node: EntityNode<'a>, rules: &RuleSet) -> Result<Map<String, Value>> {
        let kind = node.kind();
        let id = node.id();

        rules.validate_for(kind)?;

        let mut pending: Vec<&[String]> = rules.iter().map(|r| r.segments()).collect();
        for rule in self.baselines.for_kind(kind) {
            let segments = rule.segments();
            if !pending.contains(&segments) {
                pending.push(segments);
            }
        }

        match self.walk(kind, id, node, pending, 0) {
            Err(err @ FleetError::RecursionLimitExceeded { .. }) => Err(err),
            Err(other) => Err(FleetError::SerializationFailure {
                entity: kind.to_string(),
                record_id: id,
                message: other.to_string(),
            }),
            ok => ok,
        }
    }

    fn walk<'p>(
        &'p self,
        root_kind: EntityKind,
        root_id: EntityId,
        node: EntityNode<'a>,
        pending: Vec<&'p [String]>,
        depth: usize,
    ) -> Result<Map<String, Value>> {
        if depth > self.max_depth {
            return Err(FleetError::RecursionLimitExceeded {
                entity: root_kind.to_string(),
                record_id: root_id,
            });
        }

        let mut out = node.scalars();

        for rel in schema::relationships(node.kind()) {
            // Exact match at this depth: a one-segment remainder names the
            // relationship to cut.
            if pending.iter().any(|s| s.len() == 1 && s[0] == rel.name) {
                continue;
            }

            let mut child_pending: Vec<&[String]> = Vec::new();
            for suffix in &pending {
                if suffix.len() > 1 && suffix[0] == rel.name {
                    child_pending.push(&suffix[1..]);
                }
            }
            for rule in self.baselines.for_kind(rel.target) {
                let segments = rule.segments();
                if !child_pending.contains(&segments) {
                    child_pending.push(segments);
                }
            }

            match self.snapshot.resolve(node, rel.name) {
                Resolved::One(Some(child)) => {
                    let nested = self.walk(root_kind, root_id, child, child_pending, depth + 1)?;
                    out.insert(rel.name.to_string(), Value::Object(nested));
                }
                Resolved::One(None) => {
                    out.insert(rel.name.to_string(), Value::Null);
                }
                Resolved::Many(children) => {
                    let mut items = Vec::with_capacity(children.len());
                    for child in children {
                        let nested =
                            self.walk(root_kind, root_id, child, child_pending.clone(), depth + 1)?;
                        items.push(Value::Object(nested));
                    }
                    out.insert(rel.name.to_string(), Value::Array(items));
                }
            }
        }

        Ok(out)
    }
}
