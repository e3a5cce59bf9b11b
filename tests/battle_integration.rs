//! Battle Integration Tests
//!
//! Full battles from the bundled scenario files.

use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warband::battle::{Assassination, Battle, BattleEventType, BattleOutcome, BattleResult, Side};
use warband::catalog::{ids, Catalog};
use warband::combat::BattleContext;
use warband::core::types::UnitId;
use warband::core::RuleConfig;
use warband::roster::Scenario;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("scenarios")
        .join(name)
}

fn load(catalog: &Catalog, name: &str) -> Scenario {
    Scenario::load(&scenario_path(name), catalog).expect("scenario should load")
}

fn fight(catalog: &Catalog, config: &RuleConfig, scenario: &mut Scenario, seed: u64) -> BattleResult {
    let ctx = BattleContext::new(catalog, config);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Battle::new(ctx).run(scenario, &mut rng)
}

fn starting_sizes(result: &BattleResult) -> (usize, usize) {
    result
        .log
        .events
        .iter()
        .find_map(|event| match event.event_type {
            BattleEventType::BattleStarted {
                attackers,
                defenders,
            } => Some((attackers, defenders)),
            _ => None,
        })
        .expect("every battle logs its start")
}

#[test]
fn test_bundled_scenarios_load() {
    let catalog = Catalog::standard();
    for name in ["river_crossing.toml", "siege.toml", "assassination.toml"] {
        let scenario = load(&catalog, name);
        assert!(!scenario.name.is_empty(), "{} has no name", name);
        assert!(scenario.validate(&catalog).is_ok());
    }
}

#[test]
fn test_every_figure_accounted_for() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();

    for name in ["river_crossing.toml", "siege.toml"] {
        for seed in 0..8 {
            let mut scenario = load(&catalog, name);
            let result = fight(&catalog, &config, &mut scenario, seed);
            let (attackers, defenders) = starting_sizes(&result);

            assert_eq!(result.attacker.survivors + result.attacker.fallen, attackers);
            assert_eq!(result.defender.survivors + result.defender.fallen, defenders);
            assert_eq!(result.attacker.recipients.len(), result.attacker.survivors);
            assert!(result.assassination.is_none());
        }
    }
}

#[test]
fn test_roster_loses_the_fallen() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();

    for seed in 0..8 {
        let mut scenario = load(&catalog, "river_crossing.toml");
        let result = fight(&catalog, &config, &mut scenario, seed);

        let raiders = scenario.roster.unit(UnitId(1)).unwrap();
        let lost = result.attacker.losses.get(&UnitId(1)).copied().unwrap_or(0);
        assert_eq!(raiders.men(ids::VIKING), 10 - lost);
        assert_eq!(raiders.losses, lost);

        let wolves = scenario.roster.unit(UnitId(3)).unwrap();
        let lost = result.defender.losses.get(&UnitId(3)).copied().unwrap_or(0);
        assert_eq!(wolves.men(ids::WOLF), 12 - lost);
    }
}

#[test]
fn test_spoils_are_all_handed_out_or_unclaimed() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();

    for seed in 0..8 {
        let mut scenario = load(&catalog, "siege.toml");
        let result = fight(&catalog, &config, &mut scenario, seed);

        let awarded: u64 = result
            .distribution
            .awarded
            .values()
            .map(|items| items.total())
            .sum();
        assert_eq!(awarded + result.distribution.unclaimed.total(), result.spoils.total());
        if result.outcome == BattleOutcome::Draw {
            assert!(result.spoils.is_empty());
        }
    }
}

#[test]
fn test_same_seed_same_battle() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();

    let mut first = load(&catalog, "siege.toml");
    let mut second = load(&catalog, "siege.toml");
    let a = fight(&catalog, &config, &mut first, 77);
    let b = fight(&catalog, &config, &mut second, 77);

    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.rounds, b.rounds);
    assert_eq!(a.log, b.log);
    assert_eq!(a.spoils, b.spoils);
}

#[test]
fn test_assassination_reports_its_outcome() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();

    for seed in 0..8 {
        let mut scenario = load(&catalog, "assassination.toml");
        let result = fight(&catalog, &config, &mut scenario, seed);
        let (attackers, defenders) = starting_sizes(&result);
        assert_eq!((attackers, defenders), (1, 1));

        let expected = if result.outcome == BattleOutcome::Won {
            Assassination::Succeeded
        } else {
            Assassination::Failed
        };
        assert_eq!(result.assassination, Some(expected));

        // The assassin always strikes first
        let first_free = result.log.events.iter().find_map(|event| match event.event_type {
            BattleEventType::FreeRound { side } => Some(side),
            _ => None,
        });
        assert_eq!(first_free, Some(Side::Attacker));
    }
}
