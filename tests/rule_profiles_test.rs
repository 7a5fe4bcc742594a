use std::io::Write;

use fleet_serializer::core::verify;
use fleet_serializer::utils::validation::Validate;
use fleet_serializer::{
    BaselineRules, EntityKind, FleetError, ProfilesConfig, RuleSet, RuleSource,
};
use tempfile::NamedTempFile;

#[test]
fn test_every_built_in_profile_has_a_termination_proof() {
    let profiles = ProfilesConfig::defaults();
    profiles.validate().unwrap();

    // Each profile also resolves through the lookup API.
    for name in profiles.profiles.keys() {
        let (kind, rules) = profiles.rule_set(name).unwrap();
        verify::verify_rules(kind, &rules, &BaselineRules::defaults()).unwrap();
    }
}

#[test]
fn test_custom_profiles_load_from_a_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[profiles.dispatch_board]
entity = "driver"
rules = [
    "-vehicle.driver",
    "-trips.driver",
    "-trips.vehicle.driver",
    "-vehicle.trips.driver",
]
"#,
    )
    .unwrap();

    let profiles = ProfilesConfig::from_file(file.path()).unwrap();
    profiles.validate().unwrap();

    let (kind, rules) = profiles.rule_set("dispatch_board").unwrap();
    assert_eq!(kind, EntityKind::Driver);
    assert_eq!(rules.len(), 4);
}

#[test]
fn test_profile_with_an_unknown_relationship_is_rejected() {
    let profiles = ProfilesConfig::from_toml_str(
        r#"
[profiles.bad_path]
entity = "vehicle"
rules = ["-driver.odometer"]
"#,
    )
    .unwrap();

    assert!(matches!(
        profiles.validate(),
        Err(FleetError::InvalidRulePath { .. })
    ));
}

#[test]
fn test_cycle_unsafe_profile_is_rejected_with_the_looping_chain() {
    let profiles = ProfilesConfig::from_toml_str(
        r#"
[profiles.runaway]
entity = "route"
rules = ["-trips.route"]
"#,
    )
    .unwrap();

    let err = profiles.validate().unwrap_err();
    match err {
        FleetError::CycleDetected { entity, chain } => {
            assert_eq!(entity, "route");
            assert!(chain.split('.').count() >= 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extra_rules_extend_a_verified_profile() {
    let profiles = ProfilesConfig::defaults();
    let (kind, mut rules) = profiles.rule_set("routes_list").unwrap();

    let mut extra = RuleSet::parse(["-trips", "-trips"]).unwrap();
    assert_eq!(extra.len(), 1);
    extra.push("trips".parse().unwrap());
    assert_eq!(extra.len(), 1);

    rules.extend(extra);
    verify::verify_rules(kind, &rules, &BaselineRules::defaults()).unwrap();
}
