use std::collections::HashMap;

use crate::core::rules::RulePath;
use crate::domain::model::EntityKind;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelKind {
    ToOne,
    ToMany,
}

/// One named edge of the relationship schema.
#[derive(Debug, Clone, Copy)]
pub struct Relationship {
    pub name: &'static str,
    pub target: EntityKind,
    pub kind: RelKind,
}

const ADMIN_RELS: &[Relationship] = &[Relationship {
    name: "vehicles",
    target: EntityKind::Vehicle,
    kind: RelKind::ToMany,
}];

const VEHICLE_RELS: &[Relationship] = &[
    Relationship {
        name: "admin",
        target: EntityKind::Admin,
        kind: RelKind::ToOne,
    },
    Relationship {
        name: "driver",
        target: EntityKind::Driver,
        kind: RelKind::ToOne,
    },
    Relationship {
        name: "trips",
        target: EntityKind::Trip,
        kind: RelKind::ToMany,
    },
    Relationship {
        name: "maintenance_records",
        target: EntityKind::MaintenanceRecord,
        kind: RelKind::ToMany,
    },
    Relationship {
        name: "charging_sessions",
        target: EntityKind::ChargingSession,
        kind: RelKind::ToMany,
    },
];

const DRIVER_RELS: &[Relationship] = &[
    Relationship {
        name: "vehicle",
        target: EntityKind::Vehicle,
        kind: RelKind::ToOne,
    },
    Relationship {
        name: "trips",
        target: EntityKind::Trip,
        kind: RelKind::ToMany,
    },
];

const TRIP_RELS: &[Relationship] = &[
    Relationship {
        name: "driver",
        target: EntityKind::Driver,
        kind: RelKind::ToOne,
    },
    Relationship {
        name: "vehicle",
        target: EntityKind::Vehicle,
        kind: RelKind::ToOne,
    },
    Relationship {
        name: "route",
        target: EntityKind::Route,
        kind: RelKind::ToOne,
    },
];

const ROUTE_RELS: &[Relationship] = &[Relationship {
    name: "trips",
    target: EntityKind::Trip,
    kind: RelKind::ToMany,
}];

const MAINTENANCE_RELS: &[Relationship] = &[Relationship {
    name: "vehicle",
    target: EntityKind::Vehicle,
    kind: RelKind::ToOne,
}];

const CHARGING_RELS: &[Relationship] = &[Relationship {
    name: "vehicle",
    target: EntityKind::Vehicle,
    kind: RelKind::ToOne,
}];

/// Relationships declared on an entity type, in serialization order.
pub fn relationships(kind: EntityKind) -> &'static [Relationship] {
    match kind {
        EntityKind::Admin => ADMIN_RELS,
        EntityKind::Vehicle => VEHICLE_RELS,
        EntityKind::Driver => DRIVER_RELS,
        EntityKind::Trip => TRIP_RELS,
        EntityKind::Route => ROUTE_RELS,
        EntityKind::MaintenanceRecord => MAINTENANCE_RELS,
        EntityKind::ChargingSession => CHARGING_RELS,
    }
}

pub fn relationship(kind: EntityKind, name: &str) -> Option<&'static Relationship> {
    relationships(kind).iter().find(|r| r.name == name)
}

/// Per-entity-type default exclusions. An explicit table passed into the
/// serializer; the rules of a type activate at every node of that type
/// during traversal, root included.
#[derive(Debug, Clone, Default)]
pub struct BaselineRules {
    map: HashMap<EntityKind, Vec<RulePath>>,
}

fn path(segments: &[&str]) -> RulePath {
    RulePath::from_segments(segments.iter().map(|s| s.to_string()).collect())
}

impl BaselineRules {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The schema's stock baseline set: every relation suppresses its own
    /// direct back-reference.
    pub fn defaults() -> Self {
        let mut map = HashMap::new();
        map.insert(EntityKind::Admin, vec![path(&["vehicles", "admin"])]);
        map.insert(
            EntityKind::Vehicle,
            vec![
                path(&["admin", "vehicles"]),
                path(&["driver", "vehicle"]),
                path(&["trips", "vehicle"]),
                path(&["maintenance_records", "vehicle"]),
                path(&["charging_sessions", "vehicle"]),
            ],
        );
        map.insert(
            EntityKind::Driver,
            vec![path(&["vehicle", "driver"]), path(&["trips", "driver"])],
        );
        map.insert(
            EntityKind::Trip,
            vec![
                path(&["vehicle", "trips"]),
                path(&["driver", "trips"]),
                path(&["route", "trips"]),
            ],
        );
        map.insert(EntityKind::Route, vec![path(&["trips", "route"])]);
        map.insert(
            EntityKind::MaintenanceRecord,
            vec![path(&["vehicle", "maintenance_records"])],
        );
        map.insert(
            EntityKind::ChargingSession,
            vec![path(&["vehicle", "charging_sessions"])],
        );
        Self { map }
    }

    pub fn for_kind(&self, kind: EntityKind) -> &[RulePath] {
        self.map.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set(&mut self, kind: EntityKind, rules: Vec<RulePath>) {
        self.map.insert(kind, rules);
    }

    /// Every baseline path must walk valid relationship names from its
    /// own entity type.
    pub fn validate(&self) -> Result<()> {
        for (kind, rules) in &self.map {
            for rule in rules {
                rule.validate_for(*kind)?;
            }
        }
        Ok(())
    }
}
