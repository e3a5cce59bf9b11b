//! Combat engine integration tests
//!
//! Whole-army behavior through the public API: rout thresholds, armor
//! saves, effects, shields and settlement bookkeeping.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warband::catalog::{ids, ArmorDef, Catalog, WeaponFlag};
use warband::combat::setup::Deployment;
use warband::combat::{AttackOutcome, AttackSpec, Army, BattleContext, Combatant};
use warband::core::types::{AttackBin, AttackType, UnitId, WeaponClass};
use warband::core::{RoutPolicy, RuleConfig};
use warband::roster::{ItemList, Participant, Roster, Unit, UnitKind};

fn vikings(n: usize) -> Vec<Combatant> {
    (0..n)
        .map(|_| Combatant::new("Raiders", UnitId(1), ids::VIKING))
        .collect()
}

fn ogres(n: usize) -> Vec<Combatant> {
    (0..n)
        .map(|_| Combatant::new("Ogres", UnitId(2), ids::OGRE).with_hits(3))
        .collect()
}

/// Ten one-hit figures under the figures policy: five dead is not a rout,
/// six is
#[test]
fn test_ten_figures_rout_on_sixth_death() {
    let mut army = Army::from_combatants(UnitId(1), vikings(10), RoutPolicy::Figures);

    for i in 0..5 {
        assert!(army.damage_soldier(i));
    }
    assert_eq!(army.num_alive(), 5);
    assert!(!army.broken());

    assert!(army.damage_soldier(5));
    assert!(army.broken());
}

#[test]
fn test_hits_individual_counts_every_point() {
    let mut army = Army::from_combatants(UnitId(2), ogres(2), RoutPolicy::HitsIndividual);
    assert_eq!(army.hits_total(), 6);

    for _ in 0..3 {
        army.damage_soldier(0);
    }
    assert_eq!(army.hits_alive(), 3);
    assert!(!army.broken());

    army.damage_soldier(1);
    assert_eq!(army.num_alive(), 1);
    assert!(army.broken());
}

#[test]
fn test_hits_per_figure_ignores_wounded() {
    let mut army = Army::from_combatants(UnitId(2), ogres(3), RoutPolicy::HitsPerFigure);
    assert_eq!(army.hits_total(), 9);

    for _ in 0..3 {
        army.damage_soldier(0);
    }
    army.damage_soldier(1);
    army.damage_soldier(1);
    assert_eq!(army.hits_alive(), 6);
    assert!(!army.broken());

    assert!(army.damage_soldier(1));
    assert_eq!(army.hits_alive(), 3);
    assert!(army.broken());
}

#[test]
fn test_armor_two_in_four_saves_half() {
    let mut catalog = Catalog::standard();
    catalog.items[ids::LEATHER.0 as usize].armor = Some(ArmorDef {
        from: 4,
        saves: [2, 0, 0, 0, 0, 0, 0, 0],
        usable_in_assassination: false,
    });
    let mut soldier = Combatant::new("Guard", UnitId(1), ids::VIKING);
    soldier.armor = Some(ids::LEATHER);
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    let trials = 10_000;
    let saved = (0..trials)
        .filter(|_| soldier.armor_saves(WeaponClass::Slashing, &catalog, &mut rng))
        .count();
    let rate = saved as f64 / trials as f64;
    assert!((0.48..=0.52).contains(&rate), "save rate {}", rate);

    // No entry for the class: never saves
    assert!(!soldier.armor_saves(WeaponClass::Piercing, &catalog, &mut rng));
}

#[test]
fn test_cancelling_effect_clears_the_other() {
    let catalog = Catalog::standard();
    let mut soldier = Combatant::new("Raiders", UnitId(1), ids::VIKING);
    let base_attack = soldier.attack_skill;
    let base_defense = soldier.defense[AttackType::Combat.index()];

    soldier.set_effect(ids::FRIGHT, &catalog);
    assert!(soldier.has_effect(ids::FRIGHT));
    assert_eq!(soldier.attack_skill, base_attack - 2);

    soldier.set_effect(ids::COURAGE, &catalog);
    assert!(!soldier.has_effect(ids::FRIGHT));
    assert!(soldier.has_effect(ids::COURAGE));
    assert_eq!(soldier.defense[AttackType::Combat.index()], base_defense);
    assert_eq!(soldier.attack_skill, base_attack + 1);
}

#[test]
fn test_energy_shield_blocks_weak_fireballs() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();
    let ctx = BattleContext::new(&catalog, &config);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut soldiers = vikings(5);
    soldiers[0].special = Some(ids::ENERGY_SHIELD);
    soldiers[0].special_level = 20;
    let mut army = Army::from_combatants(UnitId(1), soldiers, RoutPolicy::Figures);
    army.refresh_shields(&catalog);
    assert_eq!(army.shields.len(), 1);

    let fireball = AttackSpec {
        class: WeaponClass::MagicEnergy,
        ..AttackSpec::basic(AttackType::Energy, 0, 10)
    };
    let blocked = (0..20)
        .filter(|_| army.do_an_attack(&ctx, &fireball, &mut rng) == AttackOutcome::Blocked)
        .count();
    assert_eq!(blocked, 20);
    assert_eq!(army.num_alive(), 5);

    // Melee is not covered by an energy shield
    let swing = AttackSpec::basic(AttackType::Combat, 5, 1);
    assert!(matches!(
        army.do_an_attack(&ctx, &swing, &mut rng),
        AttackOutcome::Struck { .. }
    ));
}

#[test]
fn test_kills_tallied_by_category() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();
    let ctx = BattleContext::new(&catalog, &config);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let mut army = Army::from_combatants(UnitId(1), vikings(50), RoutPolicy::Figures);
    let volley = AttackSpec {
        flags: &[WeaponFlag::Ranged, WeaponFlag::AlwaysReady],
        class: WeaponClass::Piercing,
        ..AttackSpec::basic(AttackType::Ranged, 10, 20)
    };
    let outcome = army.do_an_attack(&ctx, &volley, &mut rng);

    let summary = army.end_round(&ctx, &mut rng);
    let ranged = AttackBin::Ranged.index();
    assert_eq!(summary.kills_from[ranged], outcome.killed());
    assert_eq!(summary.losses(), outcome.killed());
    assert_eq!(army.num_alive() as u32 + outcome.killed(), 50);
}

#[test]
fn test_mustered_army_settles_without_losing_equipment() {
    let catalog = Catalog::standard();
    let config = RuleConfig::default();
    let ctx = BattleContext::new(&catalog, &config);

    let mut roster = Roster::new();
    let mut unit = Unit::new(UnitId(1), "Raiders", "Norse", UnitKind::Normal);
    unit.set_men(ids::VIKING, 6);
    unit.items.set(ids::SWORD, 6);
    unit.items.set(ids::LEATHER, 3);
    roster.add_unit(unit);

    let mut army = Army::muster(
        &ctx,
        &mut roster,
        UnitId(1),
        &[Participant::in_the_open(UnitId(1))],
        Deployment::open_field(),
    );
    let held: u64 = army
        .soldiers()
        .iter()
        .map(|s| s.equipment(&catalog).total())
        .sum();
    assert_eq!(held, 9);

    army.damage_soldier(0);
    army.damage_soldier(3);

    let mut spoils = ItemList::new();
    let settlement = army.win(&ctx, &mut roster, &mut spoils);
    assert_eq!(settlement.equipment_total(), held);
    assert_eq!(settlement.fallen, 2);

    let unit = roster.unit(UnitId(1)).unwrap();
    assert_eq!(unit.men(ids::VIKING), 4);
    assert_eq!(unit.items.get(ids::SWORD) + spoils.get(ids::SWORD), 6);
    assert_eq!(unit.items.get(ids::LEATHER) + spoils.get(ids::LEATHER), 3);
}
