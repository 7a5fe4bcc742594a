#[cfg(feature = "cli")]
pub mod cli;
pub mod profiles;

use std::fs;

use crate::domain::model::FleetSnapshot;
use crate::domain::ports::SnapshotStore;
use crate::utils::error::Result;

/// Reads a fleet snapshot from a local JSON file. Stands in for the ORM
/// read boundary, which stays outside this crate.
#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    path: String,
}

impl LocalSnapshotStore {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

impl SnapshotStore for LocalSnapshotStore {
    fn load(&self) -> Result<FleetSnapshot> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
