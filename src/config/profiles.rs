use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::core::rules::RuleSet;
use crate::core::schema::BaselineRules;
use crate::core::verify;
use crate::domain::model::EntityKind;
use crate::domain::ports::RuleSource;
use crate::utils::error::{FleetError, Result};
use crate::utils::validation::Validate;

/// Named per-endpoint exclusion rule sets, loadable from TOML:
///
/// ```toml
/// [profiles.vehicles_list]
/// entity = "vehicle"
/// rules = ["-admin.vehicles", "-driver.vehicle"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    pub profiles: HashMap<String, EndpointProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointProfile {
    pub entity: String,
    pub rules: Vec<String>,
}

fn profile(entity: &str, rules: &[&str]) -> EndpointProfile {
    EndpointProfile {
        entity: entity.to_string(),
        rules: rules.iter().map(|r| r.to_string()).collect(),
    }
}

impl ProfilesConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FleetError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| FleetError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// The stock endpoint profiles. These carry the original endpoints'
    /// rule lists plus the extra cuts needed to make every profile pass
    /// termination verification.
    pub fn defaults() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "vehicles_list".to_string(),
            profile(
                "vehicle",
                &[
                    "-admin.vehicles",
                    "-driver.vehicle",
                    "-trips.vehicle",
                    "-maintenance_records.vehicle",
                    "-charging_sessions.vehicle",
                    "-trips.driver.trips",
                    "-trips.driver.vehicle",
                    "-trips.route.trips",
                    "-driver.trips.vehicle",
                ],
            ),
        );
        profiles.insert(
            "vehicle_detail".to_string(),
            profile(
                "vehicle",
                &[
                    "-admin.vehicles",
                    "-driver.vehicle",
                    "-trips.vehicle",
                    "-trips.driver.vehicle",
                    "-trips.route.trips",
                    "-maintenance_records.vehicle",
                    "-charging_sessions.vehicle",
                    "-driver.trips.vehicle",
                ],
            ),
        );
        profiles.insert(
            "drivers_list".to_string(),
            profile(
                "driver",
                &[
                    "-vehicle.driver",
                    "-trips.driver",
                    "-trips.vehicle.driver",
                    "-vehicle.trips.driver",
                ],
            ),
        );
        profiles.insert(
            "driver_detail".to_string(),
            profile(
                "driver",
                &[
                    "-vehicle.driver",
                    "-trips.driver",
                    "-trips.vehicle.driver",
                    "-vehicle.trips.driver",
                ],
            ),
        );
        profiles.insert(
            "trips_list".to_string(),
            profile(
                "trip",
                &[
                    "-vehicle.trips",
                    "-driver.trips",
                    "-route.trips",
                    "-vehicle.driver.vehicle",
                    "-driver.vehicle.driver",
                    "-vehicle.driver.trips",
                    "-driver.vehicle.trips",
                ],
            ),
        );
        profiles.insert(
            "trip_detail".to_string(),
            profile(
                "trip",
                &[
                    "-vehicle.trips",
                    "-driver.trips",
                    "-route.trips",
                    "-vehicle.driver.trips",
                    "-driver.vehicle.trips",
                ],
            ),
        );
        profiles.insert("routes_list".to_string(), profile("route", &["-trips"]));
        profiles.insert(
            "route_detail".to_string(),
            profile(
                "route",
                &[
                    "-trips.route",
                    "-trips.vehicle.trips",
                    "-trips.driver.trips",
                    "-trips.vehicle.driver.trips",
                    "-trips.driver.vehicle.trips",
                ],
            ),
        );
        profiles.insert(
            "maintenance_records_list".to_string(),
            profile(
                "maintenance_record",
                &[
                    "-vehicle.maintenance_records",
                    "-vehicle.driver.trips",
                    "-vehicle.trips.driver",
                ],
            ),
        );
        profiles.insert(
            "maintenance_record_detail".to_string(),
            profile(
                "maintenance_record",
                &[
                    "-vehicle.maintenance_records",
                    "-vehicle.driver.trips",
                    "-vehicle.trips.driver",
                ],
            ),
        );
        profiles.insert(
            "charging_sessions_list".to_string(),
            profile(
                "charging_session",
                &[
                    "-vehicle.charging_sessions",
                    "-vehicle.driver.trips",
                    "-vehicle.trips.driver",
                ],
            ),
        );
        profiles.insert(
            "charging_session_detail".to_string(),
            profile(
                "charging_session",
                &[
                    "-vehicle.charging_sessions",
                    "-vehicle.driver.trips",
                    "-vehicle.trips.driver",
                ],
            ),
        );
        // Used by the auth endpoints (login, signup, session check).
        profiles.insert(
            "admin_detail".to_string(),
            profile(
                "admin",
                &["-vehicles.driver.trips", "-vehicles.trips.driver"],
            ),
        );
        Self { profiles }
    }

    /// Check every profile: known entity, schema-valid rule paths, and a
    /// termination proof against the given baselines.
    pub fn validate_with(&self, baselines: &BaselineRules) -> Result<()> {
        for (name, endpoint) in &self.profiles {
            let kind =
                EntityKind::parse(&endpoint.entity).map_err(|_| FleetError::ConfigValidationError {
                    field: format!("profiles.{}.entity", name),
                    message: format!("unknown entity type '{}'", endpoint.entity),
                })?;
            let rules = RuleSet::parse(&endpoint.rules)?;
            verify::verify_rules(kind, &rules, baselines)?;
        }
        Ok(())
    }
}

impl RuleSource for ProfilesConfig {
    fn rule_set(&self, name: &str) -> Result<(EntityKind, RuleSet)> {
        let endpoint = self
            .profiles
            .get(name)
            .ok_or_else(|| FleetError::UnknownProfile {
                name: name.to_string(),
            })?;
        let kind = EntityKind::parse(&endpoint.entity)?;
        let rules = RuleSet::parse(&endpoint.rules)?;
        Ok((kind, rules))
    }
}

impl Validate for ProfilesConfig {
    fn validate(&self) -> Result<()> {
        self.validate_with(&BaselineRules::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_all_verify() {
        ProfilesConfig::defaults().validate().unwrap();
    }

    #[test]
    fn test_rule_set_lookup() {
        let config = ProfilesConfig::defaults();
        let (kind, rules) = config.rule_set("routes_list").unwrap();
        assert_eq!(kind, EntityKind::Route);
        assert_eq!(rules.len(), 1);

        assert!(matches!(
            config.rule_set("cargo_manifest"),
            Err(FleetError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn test_parse_profiles_toml() {
        let toml_content = r#"
[profiles.fleet_overview]
entity = "route"
rules = ["-trips"]
"#;
        let config = ProfilesConfig::from_toml_str(toml_content).unwrap();
        config.validate().unwrap();
        assert_eq!(config.profiles["fleet_overview"].entity, "route");
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let toml_content = r#"
[profiles.bad]
entity = "hovercraft"
rules = []
"#;
        let config = ProfilesConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(FleetError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_cycle_unsafe_profile_is_rejected() {
        // Baselines alone cannot terminate a vehicle root.
        let toml_content = r#"
[profiles.unsafe]
entity = "vehicle"
rules = []
"#;
        let config = ProfilesConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(FleetError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FLEET_PROFILE_ENTITY", "route");

        let toml_content = r#"
[profiles.env_profile]
entity = "${FLEET_PROFILE_ENTITY}"
rules = ["-trips"]
"#;
        let config = ProfilesConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.profiles["env_profile"].entity, "route");

        std::env::remove_var("FLEET_PROFILE_ENTITY");
    }
}
