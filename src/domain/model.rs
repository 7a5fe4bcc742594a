use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::utils::error::{FleetError, Result};

pub type EntityId = i64;

/// The seven entity types of the fleet schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Admin,
    Vehicle,
    Driver,
    Trip,
    Route,
    MaintenanceRecord,
    ChargingSession,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Admin => "admin",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Driver => "driver",
            EntityKind::Trip => "trip",
            EntityKind::Route => "route",
            EntityKind::MaintenanceRecord => "maintenance_record",
            EntityKind::ChargingSession => "charging_session",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "admin" => Ok(EntityKind::Admin),
            "vehicle" => Ok(EntityKind::Vehicle),
            "driver" => Ok(EntityKind::Driver),
            "trip" => Ok(EntityKind::Trip),
            "route" => Ok(EntityKind::Route),
            "maintenance_record" => Ok(EntityKind::MaintenanceRecord),
            "charging_session" => Ok(EntityKind::ChargingSession),
            _ => Err(FleetError::UnknownEntity {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Idle,
    Active,
    Maintenance,
    Charging,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Idle => "idle",
            VehicleStatus::Active => "active",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Charging => "charging",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: EntityId,
    pub email: String,
    // Write-only credential material; never emitted by the serializer.
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: EntityId,
    pub model: String,
    pub capacity: i64,
    pub number_plate: String,
    pub current_status: VehicleStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub admin_id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: EntityId,
    pub name: String,
    pub driving_license_number: i64,
    pub national_id_number: i64,
    pub phone: String,
    pub email: String,
    pub is_available: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vehicle_id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: EntityId,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub driver_id: EntityId,
    pub vehicle_id: EntityId,
    pub route_id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: EntityId,
    pub name: String,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: EntityId,
    pub description: String,
    pub record_date: DateTime<Utc>,
    #[serde(default)]
    pub resolved_date: Option<DateTime<Utc>>,
    pub resolved: bool,
    pub vehicle_id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingSession {
    pub id: EntityId,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub energy_kwh: f64,
    pub vehicle_id: EntityId,
}

/// A fully loaded read snapshot of the fleet database. The storage layer
/// owns creation and mutation; the serializer only reads from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    #[serde(default)]
    pub admins: Vec<Admin>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub maintenance_records: Vec<MaintenanceRecord>,
    #[serde(default)]
    pub charging_sessions: Vec<ChargingSession>,
}

/// A typed reference to one record inside a snapshot.
#[derive(Debug, Clone, Copy)]
pub enum EntityNode<'a> {
    Admin(&'a Admin),
    Vehicle(&'a Vehicle),
    Driver(&'a Driver),
    Trip(&'a Trip),
    Route(&'a Route),
    MaintenanceRecord(&'a MaintenanceRecord),
    ChargingSession(&'a ChargingSession),
}

/// A resolved relationship: one optional record or an ordered list.
pub enum Resolved<'a> {
    One(Option<EntityNode<'a>>),
    Many(Vec<EntityNode<'a>>),
}

fn dt(value: &Option<DateTime<Utc>>) -> Value {
    match value {
        Some(ts) => Value::String(ts.to_rfc3339()),
        None => Value::Null,
    }
}

impl<'a> EntityNode<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityNode::Admin(_) => EntityKind::Admin,
            EntityNode::Vehicle(_) => EntityKind::Vehicle,
            EntityNode::Driver(_) => EntityKind::Driver,
            EntityNode::Trip(_) => EntityKind::Trip,
            EntityNode::Route(_) => EntityKind::Route,
            EntityNode::MaintenanceRecord(_) => EntityKind::MaintenanceRecord,
            EntityNode::ChargingSession(_) => EntityKind::ChargingSession,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            EntityNode::Admin(a) => a.id,
            EntityNode::Vehicle(v) => v.id,
            EntityNode::Driver(d) => d.id,
            EntityNode::Trip(t) => t.id,
            EntityNode::Route(r) => r.id,
            EntityNode::MaintenanceRecord(m) => m.id,
            EntityNode::ChargingSession(c) => c.id,
        }
    }

    /// Scalar columns of the record, relationship keys excluded.
    pub fn scalars(&self) -> Map<String, Value> {
        let mut out = Map::new();
        match self {
            EntityNode::Admin(a) => {
                out.insert("id".to_string(), json!(a.id));
                out.insert("email".to_string(), json!(a.email));
                out.insert("created_at".to_string(), dt(&a.created_at));
                out.insert("updated_at".to_string(), dt(&a.updated_at));
            }
            EntityNode::Vehicle(v) => {
                out.insert("id".to_string(), json!(v.id));
                out.insert("model".to_string(), json!(v.model));
                out.insert("capacity".to_string(), json!(v.capacity));
                out.insert("number_plate".to_string(), json!(v.number_plate));
                out.insert(
                    "current_status".to_string(),
                    json!(v.current_status.as_str()),
                );
                out.insert("created_at".to_string(), dt(&v.created_at));
                out.insert("updated_at".to_string(), dt(&v.updated_at));
                out.insert("admin_id".to_string(), json!(v.admin_id));
            }
            EntityNode::Driver(d) => {
                out.insert("id".to_string(), json!(d.id));
                out.insert("name".to_string(), json!(d.name));
                out.insert(
                    "driving_license_number".to_string(),
                    json!(d.driving_license_number),
                );
                out.insert(
                    "national_id_number".to_string(),
                    json!(d.national_id_number),
                );
                out.insert("phone".to_string(), json!(d.phone));
                out.insert("email".to_string(), json!(d.email));
                out.insert("is_available".to_string(), json!(d.is_available));
                out.insert("created_at".to_string(), dt(&d.created_at));
                out.insert("updated_at".to_string(), dt(&d.updated_at));
                out.insert("vehicle_id".to_string(), json!(d.vehicle_id));
            }
            EntityNode::Trip(t) => {
                out.insert("id".to_string(), json!(t.id));
                out.insert("start_time".to_string(), dt(&t.start_time));
                out.insert("end_time".to_string(), dt(&t.end_time));
                out.insert("completed".to_string(), json!(t.completed));
                out.insert("driver_id".to_string(), json!(t.driver_id));
                out.insert("vehicle_id".to_string(), json!(t.vehicle_id));
                out.insert("route_id".to_string(), json!(t.route_id));
            }
            EntityNode::Route(r) => {
                out.insert("id".to_string(), json!(r.id));
                out.insert("name".to_string(), json!(r.name));
                out.insert("start_latitude".to_string(), json!(r.start_latitude));
                out.insert("start_longitude".to_string(), json!(r.start_longitude));
                out.insert("end_latitude".to_string(), json!(r.end_latitude));
                out.insert("end_longitude".to_string(), json!(r.end_longitude));
            }
            EntityNode::MaintenanceRecord(m) => {
                out.insert("id".to_string(), json!(m.id));
                out.insert("description".to_string(), json!(m.description));
                out.insert(
                    "record_date".to_string(),
                    Value::String(m.record_date.to_rfc3339()),
                );
                out.insert("resolved_date".to_string(), dt(&m.resolved_date));
                out.insert("resolved".to_string(), json!(m.resolved));
                out.insert("vehicle_id".to_string(), json!(m.vehicle_id));
            }
            EntityNode::ChargingSession(c) => {
                out.insert("id".to_string(), json!(c.id));
                out.insert(
                    "start_time".to_string(),
                    Value::String(c.start_time.to_rfc3339()),
                );
                out.insert("end_time".to_string(), dt(&c.end_time));
                out.insert("energy_kwh".to_string(), json!(c.energy_kwh));
                out.insert("vehicle_id".to_string(), json!(c.vehicle_id));
            }
        }
        out
    }
}

impl FleetSnapshot {
    pub fn admin(&self, id: EntityId) -> Option<&Admin> {
        self.admins.iter().find(|a| a.id == id)
    }

    pub fn vehicle(&self, id: EntityId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn driver(&self, id: EntityId) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub fn trip(&self, id: EntityId) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    pub fn route(&self, id: EntityId) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    /// Look up one record by kind and id.
    pub fn find(&self, kind: EntityKind, id: EntityId) -> Option<EntityNode<'_>> {
        match kind {
            EntityKind::Admin => self.admin(id).map(EntityNode::Admin),
            EntityKind::Vehicle => self.vehicle(id).map(EntityNode::Vehicle),
            EntityKind::Driver => self.driver(id).map(EntityNode::Driver),
            EntityKind::Trip => self.trip(id).map(EntityNode::Trip),
            EntityKind::Route => self.route(id).map(EntityNode::Route),
            EntityKind::MaintenanceRecord => self
                .maintenance_records
                .iter()
                .find(|m| m.id == id)
                .map(EntityNode::MaintenanceRecord),
            EntityKind::ChargingSession => self
                .charging_sessions
                .iter()
                .find(|c| c.id == id)
                .map(EntityNode::ChargingSession),
        }
    }

    /// All records of one kind, in snapshot order.
    pub fn all(&self, kind: EntityKind) -> Vec<EntityNode<'_>> {
        match kind {
            EntityKind::Admin => self.admins.iter().map(EntityNode::Admin).collect(),
            EntityKind::Vehicle => self.vehicles.iter().map(EntityNode::Vehicle).collect(),
            EntityKind::Driver => self.drivers.iter().map(EntityNode::Driver).collect(),
            EntityKind::Trip => self.trips.iter().map(EntityNode::Trip).collect(),
            EntityKind::Route => self.routes.iter().map(EntityNode::Route).collect(),
            EntityKind::MaintenanceRecord => self
                .maintenance_records
                .iter()
                .map(EntityNode::MaintenanceRecord)
                .collect(),
            EntityKind::ChargingSession => self
                .charging_sessions
                .iter()
                .map(EntityNode::ChargingSession)
                .collect(),
        }
    }

    /// Resolve a named relationship of a record against the snapshot.
    /// Relationship names come from the static schema; an unknown name
    /// resolves to an empty to-one.
    pub fn resolve<'a>(&'a self, node: EntityNode<'a>, relationship: &str) -> Resolved<'a> {
        match (node, relationship) {
            (EntityNode::Admin(a), "vehicles") => Resolved::Many(
                self.vehicles
                    .iter()
                    .filter(|v| v.admin_id == Some(a.id))
                    .map(EntityNode::Vehicle)
                    .collect(),
            ),
            (EntityNode::Vehicle(v), "admin") => Resolved::One(
                v.admin_id
                    .and_then(|id| self.admin(id))
                    .map(EntityNode::Admin),
            ),
            (EntityNode::Vehicle(v), "driver") => Resolved::One(
                self.drivers
                    .iter()
                    .find(|d| d.vehicle_id == Some(v.id))
                    .map(EntityNode::Driver),
            ),
            (EntityNode::Vehicle(v), "trips") => Resolved::Many(
                self.trips
                    .iter()
                    .filter(|t| t.vehicle_id == v.id)
                    .map(EntityNode::Trip)
                    .collect(),
            ),
            (EntityNode::Vehicle(v), "maintenance_records") => Resolved::Many(
                self.maintenance_records
                    .iter()
                    .filter(|m| m.vehicle_id == v.id)
                    .map(EntityNode::MaintenanceRecord)
                    .collect(),
            ),
            (EntityNode::Vehicle(v), "charging_sessions") => Resolved::Many(
                self.charging_sessions
                    .iter()
                    .filter(|c| c.vehicle_id == v.id)
                    .map(EntityNode::ChargingSession)
                    .collect(),
            ),
            (EntityNode::Driver(d), "vehicle") => Resolved::One(
                d.vehicle_id
                    .and_then(|id| self.vehicle(id))
                    .map(EntityNode::Vehicle),
            ),
            (EntityNode::Driver(d), "trips") => Resolved::Many(
                self.trips
                    .iter()
                    .filter(|t| t.driver_id == d.id)
                    .map(EntityNode::Trip)
                    .collect(),
            ),
            (EntityNode::Trip(t), "driver") => {
                Resolved::One(self.driver(t.driver_id).map(EntityNode::Driver))
            }
            (EntityNode::Trip(t), "vehicle") => {
                Resolved::One(self.vehicle(t.vehicle_id).map(EntityNode::Vehicle))
            }
            (EntityNode::Trip(t), "route") => {
                Resolved::One(self.route(t.route_id).map(EntityNode::Route))
            }
            (EntityNode::Route(r), "trips") => Resolved::Many(
                self.trips
                    .iter()
                    .filter(|t| t.route_id == r.id)
                    .map(EntityNode::Trip)
                    .collect(),
            ),
            (EntityNode::MaintenanceRecord(m), "vehicle") => {
                Resolved::One(self.vehicle(m.vehicle_id).map(EntityNode::Vehicle))
            }
            (EntityNode::ChargingSession(c), "vehicle") => {
                Resolved::One(self.vehicle(c.vehicle_id).map(EntityNode::Vehicle))
            }
            _ => Resolved::One(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_roundtrip() {
        for kind in [
            EntityKind::Admin,
            EntityKind::Vehicle,
            EntityKind::Driver,
            EntityKind::Trip,
            EntityKind::Route,
            EntityKind::MaintenanceRecord,
            EntityKind::ChargingSession,
        ] {
            assert_eq!(EntityKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(EntityKind::parse("spaceship").is_err());
    }

    #[test]
    fn test_snapshot_from_json() {
        let snapshot: FleetSnapshot = serde_json::from_value(json!({
            "vehicles": [
                {"id": 1, "model": "e-Bus 300", "capacity": 40,
                 "number_plate": "KDA 001A", "current_status": "idle",
                 "admin_id": null}
            ],
            "drivers": [
                {"id": 7, "name": "A. Mwangi", "driving_license_number": 555,
                 "national_id_number": 999, "phone": "0700", "email": "a@x.io",
                 "is_available": true, "vehicle_id": 1}
            ]
        }))
        .unwrap();

        assert_eq!(snapshot.vehicles.len(), 1);
        assert_eq!(
            snapshot.vehicles[0].current_status,
            VehicleStatus::Idle
        );

        let node = snapshot.find(EntityKind::Vehicle, 1).unwrap();
        match snapshot.resolve(node, "driver") {
            Resolved::One(Some(EntityNode::Driver(d))) => assert_eq!(d.id, 7),
            _ => panic!("expected resolved driver"),
        }
    }

    #[test]
    fn test_scalars_hide_password_hash() {
        let admin = Admin {
            id: 1,
            email: "ops@fleet.io".to_string(),
            password_hash: Some("$2b$12$abcdef".to_string()),
            created_at: None,
            updated_at: None,
        };
        let scalars = EntityNode::Admin(&admin).scalars();
        assert!(scalars.contains_key("email"));
        assert!(!scalars.contains_key("password_hash"));
    }
}
