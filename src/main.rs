use clap::Parser;
use fleet_serializer::core::response;
use fleet_serializer::utils::error::FleetError;
use fleet_serializer::utils::{logger, validation::Validate};
use fleet_serializer::{
    BaselineRules, CliConfig, LocalSnapshotStore, ProfilesConfig, RuleSource, Serializer,
    SnapshotStore,
};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting fleet-serializer CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let profiles = match &config.profiles {
        Some(path) => ProfilesConfig::from_file(path)?,
        None => ProfilesConfig::defaults(),
    };

    let baselines = BaselineRules::defaults();
    profiles.validate_with(&baselines)?;
    tracing::info!(
        "{} rule profile(s) verified against the schema",
        profiles.profiles.len()
    );

    if config.verify_only {
        println!("✅ All rule profiles verified");
        return Ok(());
    }

    let (kind, mut rules) = profiles.rule_set(&config.profile)?;
    if !config.rules.is_empty() {
        // Ad-hoc rules can change what the profile's proof covered, so the
        // combined set is verified again.
        for raw in &config.rules {
            rules.push(raw.parse()?);
        }
        fleet_serializer::core::verify::verify_rules(kind, &rules, &baselines)?;
        tracing::debug!("{} extra rule(s) merged and re-verified", config.rules.len());
    }

    let store = LocalSnapshotStore::new(config.snapshot.clone());
    let snapshot = store.load()?;
    tracing::info!("Snapshot loaded from {}", config.snapshot);

    let serializer = Serializer::new(&snapshot, baselines).with_max_depth(config.max_depth);

    let body = match config.id {
        Some(id) => {
            let node = snapshot.find(kind, id).ok_or(FleetError::RecordNotFound {
                entity: kind.to_string(),
                id,
            })?;
            match response::detail_response(&serializer, node, &rules) {
                Ok(body) => body,
                Err(placeholder) => {
                    println!("{}", serde_json::to_string_pretty(&placeholder)?);
                    std::process::exit(1);
                }
            }
        }
        None => serde_json::Value::Array(response::list_response(
            &serializer,
            snapshot.all(kind),
            &rules,
        )),
    };

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
