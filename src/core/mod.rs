pub mod response;
pub mod rules;
pub mod schema;
pub mod serializer;
pub mod verify;

pub use crate::domain::model::{EntityKind, EntityNode, FleetSnapshot};
pub use crate::domain::ports::{RuleSource, SnapshotStore};
pub use crate::utils::error::Result;
