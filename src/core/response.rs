use serde_json::{json, Value};

use crate::core::rules::RuleSet;
use crate::core::serializer::Serializer;
use crate::domain::model::{EntityId, EntityNode};
use crate::utils::error::FleetError;

/// Placeholder record substituted for an entity that failed to serialize.
pub fn error_placeholder(err: &FleetError, record_id: EntityId) -> Value {
    let message = match err {
        FleetError::RecursionLimitExceeded { .. } => {
            "Serialization failed due to recursion".to_string()
        }
        other => format!("Serialization failed: {}", other),
    };
    json!({ "error": message, "record_id": record_id })
}

/// Body for a single-record endpoint. `Err` carries the placeholder the
/// routing layer should return with a 500-equivalent status.
pub fn detail_response(
    serializer: &Serializer<'_>,
    node: EntityNode<'_>,
    rules: &RuleSet,
) -> std::result::Result<Value, Value> {
    match serializer.serialize(node, rules) {
        Ok(body) => Ok(Value::Object(body)),
        Err(err) => {
            tracing::warn!(
                entity = node.kind().as_str(),
                record_id = node.id(),
                "serialization failed: {err}"
            );
            Err(error_placeholder(&err, node.id()))
        }
    }
}

/// Body for a list endpoint. Each record serializes independently; a
/// failing record becomes its placeholder in the same position and never
/// affects its siblings.
pub fn list_response<'a, I>(serializer: &Serializer<'a>, nodes: I, rules: &RuleSet) -> Vec<Value>
where
    I: IntoIterator<Item = EntityNode<'a>>,
{
    nodes
        .into_iter()
        .map(|node| match serializer.serialize(node, rules) {
            Ok(body) => Value::Object(body),
            Err(err) => {
                tracing::warn!(
                    entity = node.kind().as_str(),
                    record_id = node.id(),
                    "skipping record, serialization failed: {err}"
                );
                error_placeholder(&err, node.id())
            }
        })
        .collect()
}
