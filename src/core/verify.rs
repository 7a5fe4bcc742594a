use std::collections::{BTreeSet, HashSet};

use crate::core::rules::RuleSet;
use crate::core::schema::{self, BaselineRules};
use crate::domain::model::EntityKind;
use crate::utils::error::{FleetError, Result};

/// Abstract traversal state: the entity type reached plus the rule
/// suffixes still pending along this path. Finitely many exist for a fixed
/// schema and rule set, so exploration always terminates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct State {
    kind: EntityKind,
    pending: BTreeSet<Vec<String>>,
}

/// Prove by exhaustive path enumeration that serializing any record of
/// `root` under `rules` + `baselines` terminates. An uncut cycle is
/// reported with the relationship chain that loops.
pub fn verify_rules(root: EntityKind, rules: &RuleSet, baselines: &BaselineRules) -> Result<()> {
    rules.validate_for(root)?;
    baselines.validate()?;

    let mut pending: BTreeSet<Vec<String>> =
        rules.iter().map(|r| r.segments().to_vec()).collect();
    for rule in baselines.for_kind(root) {
        pending.insert(rule.segments().to_vec());
    }

    let start = State {
        kind: root,
        pending,
    };
    let mut safe = HashSet::new();
    let mut stack = Vec::new();
    let mut trail = Vec::new();

    explore(start, baselines, &mut safe, &mut stack, &mut trail).map_err(|chain| {
        FleetError::CycleDetected {
            entity: root.to_string(),
            chain: chain.join("."),
        }
    })
}

fn explore(
    state: State,
    baselines: &BaselineRules,
    safe: &mut HashSet<State>,
    stack: &mut Vec<State>,
    trail: &mut Vec<&'static str>,
) -> std::result::Result<(), Vec<&'static str>> {
    if safe.contains(&state) {
        return Ok(());
    }
    stack.push(state.clone());

    for rel in schema::relationships(state.kind) {
        if state.pending.iter().any(|s| s.len() == 1 && s[0] == rel.name) {
            continue;
        }

        let mut child_pending: BTreeSet<Vec<String>> = state
            .pending
            .iter()
            .filter(|s| s.len() > 1 && s[0] == rel.name)
            .map(|s| s[1..].to_vec())
            .collect();
        for rule in baselines.for_kind(rel.target) {
            child_pending.insert(rule.segments().to_vec());
        }

        let child = State {
            kind: rel.target,
            pending: child_pending,
        };

        // A state already on the exploration stack means the traversal can
        // repeat it at ever-growing depth: an uncut cycle.
        if let Some(pos) = stack.iter().position(|s| *s == child) {
            let mut chain: Vec<&'static str> = trail[pos..].to_vec();
            chain.push(rel.name);
            return Err(chain);
        }
        if safe.contains(&child) {
            continue;
        }

        trail.push(rel.name);
        let outcome = explore(child, baselines, safe, stack, trail);
        trail.pop();
        outcome?;
    }

    stack.pop();
    safe.insert(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::RulePath;

    const ALL_KINDS: [EntityKind; 7] = [
        EntityKind::Admin,
        EntityKind::Vehicle,
        EntityKind::Driver,
        EntityKind::Trip,
        EntityKind::Route,
        EntityKind::MaintenanceRecord,
        EntityKind::ChargingSession,
    ];

    #[test]
    fn test_baselines_alone_leave_the_triangle_uncut() {
        // Every root reaches the vehicle-driver-trip triangle, so the
        // stock baselines never terminate on their own.
        for kind in ALL_KINDS {
            let err = verify_rules(kind, &RuleSet::default(), &BaselineRules::defaults())
                .unwrap_err();
            match err {
                FleetError::CycleDetected { chain, .. } => assert!(!chain.is_empty()),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_augmented_baselines_terminate_for_every_root() {
        let mut baselines = BaselineRules::defaults();
        baselines.set(
            EntityKind::Driver,
            vec![
                RulePath::parse("vehicle.driver").unwrap(),
                RulePath::parse("trips.driver").unwrap(),
                RulePath::parse("vehicle.trips").unwrap(),
                RulePath::parse("trips.vehicle").unwrap(),
            ],
        );
        for kind in ALL_KINDS {
            verify_rules(kind, &RuleSet::default(), &baselines).unwrap();
        }
    }

    #[test]
    fn test_caller_rules_can_cut_what_baselines_miss() {
        let rules = RuleSet::parse([
            "-admin.vehicles",
            "-driver.vehicle",
            "-trips.vehicle",
            "-maintenance_records.vehicle",
            "-charging_sessions.vehicle",
            "-trips.driver.trips",
            "-trips.driver.vehicle",
            "-trips.route.trips",
            "-driver.trips.vehicle",
        ])
        .unwrap();
        verify_rules(EntityKind::Vehicle, &rules, &BaselineRules::defaults()).unwrap();
    }

    #[test]
    fn test_reported_chain_is_a_real_loop() {
        let err = verify_rules(
            EntityKind::Vehicle,
            &RuleSet::default(),
            &BaselineRules::defaults(),
        )
        .unwrap_err();
        let chain = match err {
            FleetError::CycleDetected { chain, .. } => chain,
            other => panic!("unexpected error: {other}"),
        };
        // The chain walks real relationship edges.
        assert!(chain.split('.').count() >= 2);
    }

    #[test]
    fn test_invalid_caller_rules_are_rejected() {
        let rules = RuleSet::parse(["-driver.flux_capacitor"]).unwrap();
        assert!(matches!(
            verify_rules(EntityKind::Vehicle, &rules, &BaselineRules::defaults()),
            Err(FleetError::InvalidRulePath { .. })
        ));
    }
}
