use fleet_serializer::core::response;
use fleet_serializer::{BaselineRules, EntityKind, FleetSnapshot, RuleSet, Serializer};
use serde_json::json;

/// Three vehicles; only the middle one sits on an uncut driver/trip cycle.
fn mixed_snapshot() -> FleetSnapshot {
    serde_json::from_value(json!({
        "vehicles": [
            {"id": 1, "model": "e-Shuttle", "capacity": 14,
             "number_plate": "KDB 001B", "current_status": "idle", "admin_id": null},
            {"id": 2, "model": "e-Bus 300", "capacity": 40,
             "number_plate": "KDA 002A", "current_status": "active", "admin_id": null},
            {"id": 3, "model": "e-Van", "capacity": 8,
             "number_plate": "KDC 003C", "current_status": "charging", "admin_id": null}
        ],
        "drivers": [
            {"id": 2, "name": "B. Otieno", "driving_license_number": 1002,
             "national_id_number": 2002, "phone": "0700000002",
             "email": "b@fleet.io", "is_available": true, "vehicle_id": 2}
        ],
        "trips": [
            {"id": 1, "completed": false, "driver_id": 2, "vehicle_id": 2, "route_id": 1}
        ],
        "routes": [{"id": 1, "name": "CBD loop",
                    "start_latitude": -1.28, "start_longitude": 36.82,
                    "end_latitude": -1.30, "end_longitude": 36.78}]
    }))
    .unwrap()
}

#[test]
fn test_list_isolates_a_failing_record() {
    let snapshot = mixed_snapshot();
    let serializer = Serializer::new(&snapshot, BaselineRules::defaults());

    let bodies = response::list_response(
        &serializer,
        snapshot.all(EntityKind::Vehicle),
        &RuleSet::default(),
    );

    assert_eq!(bodies.len(), 3);

    // Healthy records keep their shape and their position.
    assert_eq!(bodies[0]["id"], 1);
    assert_eq!(bodies[2]["id"], 3);
    assert!(bodies[0].as_object().unwrap().contains_key("number_plate"));

    // The failing record becomes a placeholder in the same slot.
    let placeholder = bodies[1].as_object().unwrap();
    assert_eq!(placeholder.len(), 2);
    assert_eq!(placeholder["error"], "Serialization failed due to recursion");
    assert_eq!(placeholder["record_id"], 2);
}

#[test]
fn test_detail_returns_the_placeholder_as_error() {
    let snapshot = mixed_snapshot();
    let serializer = Serializer::new(&snapshot, BaselineRules::defaults());
    let node = snapshot.find(EntityKind::Vehicle, 2).unwrap();

    let err = response::detail_response(&serializer, node, &RuleSet::default()).unwrap_err();
    assert_eq!(err["error"], "Serialization failed due to recursion");
    assert_eq!(err["record_id"], 2);
}

#[test]
fn test_detail_succeeds_for_a_healthy_record() {
    let snapshot = mixed_snapshot();
    let serializer = Serializer::new(&snapshot, BaselineRules::defaults());
    let node = snapshot.find(EntityKind::Vehicle, 1).unwrap();

    let body = response::detail_response(&serializer, node, &RuleSet::default()).unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["driver"], serde_json::Value::Null);
    assert_eq!(body["trips"], json!([]));
}

#[test]
fn test_lower_depth_cap_fails_sooner_but_identically() {
    let snapshot = mixed_snapshot();
    let serializer = Serializer::new(&snapshot, BaselineRules::defaults()).with_max_depth(4);
    let node = snapshot.find(EntityKind::Vehicle, 2).unwrap();

    let err = response::detail_response(&serializer, node, &RuleSet::default()).unwrap_err();
    assert_eq!(err["error"], "Serialization failed due to recursion");
    assert_eq!(err["record_id"], 2);
}
