use clap::Parser;

use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

#[derive(Debug, Clone, Parser)]
#[command(name = "fleet-serializer")]
#[command(about = "Serialize fleet records to JSON with cycle-safe exclusion rules")]
pub struct CliConfig {
    #[arg(long, default_value = "./fleet_snapshot.json")]
    pub snapshot: String,

    #[arg(long, help = "TOML file with endpoint rule profiles (built-ins when omitted)")]
    pub profiles: Option<String>,

    #[arg(long, default_value = "vehicles_list")]
    pub profile: String,

    #[arg(long, help = "Serialize a single record instead of the whole list")]
    pub id: Option<i64>,

    #[arg(long, value_delimiter = ',', help = "Extra exclusion rules for this call")]
    pub rules: Vec<String>,

    #[arg(long, default_value = "32")]
    pub max_depth: usize,

    #[arg(long, help = "Verify rule profiles against the schema and exit")]
    pub verify_only: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log in JSON format")]
    pub log_json: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("snapshot", &self.snapshot)?;
        validation::validate_non_empty_string("profile", &self.profile)?;
        validation::validate_positive_number("max_depth", self.max_depth, 1)?;
        if let Some(path) = &self.profiles {
            validation::validate_path("profiles", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CliConfig::parse_from(["fleet-serializer"]);
        config.validate().unwrap();
        assert_eq!(config.profile, "vehicles_list");
        assert_eq!(config.max_depth, 32);
    }

    #[test]
    fn test_zero_max_depth_is_rejected() {
        let config = CliConfig::parse_from(["fleet-serializer", "--max-depth", "0"]);
        assert!(config.validate().is_err());
    }
}
