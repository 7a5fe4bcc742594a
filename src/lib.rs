pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::profiles::{EndpointProfile, ProfilesConfig};
pub use config::LocalSnapshotStore;

pub use core::rules::{RulePath, RuleSet};
pub use core::schema::BaselineRules;
pub use core::serializer::Serializer;
pub use domain::model::{EntityKind, EntityNode, FleetSnapshot};
pub use domain::ports::{RuleSource, SnapshotStore};
pub use utils::error::{FleetError, Result};
