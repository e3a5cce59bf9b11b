//! Property tests for army bookkeeping

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warband::catalog::{ids, Catalog};
use warband::combat::{AttackSpec, Army, BattleContext, Combatant};
use warband::core::types::{AttackType, UnitId};
use warband::core::{RoutPolicy, RuleConfig};
use warband::roster::{ItemList, Roster, Unit, UnitKind};

fn army_of(hits: &[i32], rout_policy: RoutPolicy) -> Army {
    let soldiers = hits
        .iter()
        .map(|h| Combatant::new("Raiders", UnitId(1), ids::VIKING).with_hits(*h))
        .collect();
    Army::from_combatants(UnitId(1), soldiers, rout_policy)
}

proptest! {
    #[test]
    fn damage_never_drops_hits_below_zero(
        hits in prop::collection::vec(1i32..5, 1..12),
        blows in prop::collection::vec(0usize..12, 0..60),
    ) {
        let mut army = army_of(&hits, RoutPolicy::HitsIndividual);
        for index in blows {
            army.damage_soldier(index);
        }

        for soldier in army.soldiers() {
            prop_assert!(soldier.hits >= 0);
            prop_assert!(soldier.hits <= soldier.max_hits);
        }
        let living: i64 = army.soldiers().iter().map(|s| s.hits as i64).sum();
        prop_assert_eq!(army.hits_alive(), living);
        prop_assert_eq!(
            army.num_alive(),
            army.soldiers().iter().filter(|s| s.is_alive()).count()
        );
    }

    #[test]
    fn regeneration_keeps_the_hit_tally(
        hits in prop::collection::vec(1i32..6, 1..8),
        regen in 0i32..4,
        rounds in prop::collection::vec(prop::collection::vec(0usize..8, 0..10), 1..6),
    ) {
        let soldiers = hits
            .iter()
            .map(|h| {
                let mut troll = Combatant::new("Trolls", UnitId(3), ids::TROLL).with_hits(*h);
                troll.regen = regen;
                troll
            })
            .collect();
        let mut army = Army::from_combatants(UnitId(3), soldiers, RoutPolicy::HitsIndividual);

        for blows in rounds {
            for index in blows {
                army.damage_soldier(index);
            }
            army.regenerate();
            let living: i64 = army.soldiers().iter().map(|s| s.hits as i64).sum();
            prop_assert_eq!(army.hits_alive(), living);
            prop_assert!(army.hits_alive() <= army.hits_total());
        }
    }

    #[test]
    fn figures_rout_exactly_past_half(count in 1usize..40, deaths in 0usize..40) {
        let deaths = deaths.min(count);
        let mut army = army_of(&vec![1; count], RoutPolicy::Figures);
        for index in 0..deaths {
            army.damage_soldier(index);
        }
        prop_assert_eq!(army.broken(), (count - deaths) * 2 < count);
    }

    #[test]
    fn survivors_and_kills_add_up(count in 1usize..30, attacks in 0u32..60, seed in any::<u64>()) {
        let catalog = Catalog::standard();
        let config = RuleConfig::default();
        let ctx = BattleContext::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut army = army_of(&vec![1; count], RoutPolicy::Figures);

        let outcome = army.do_an_attack(&ctx, &AttackSpec::basic(AttackType::Combat, 2, attacks), &mut rng);
        prop_assert!(outcome.killed() <= outcome.landed());
        prop_assert_eq!(army.num_alive() + outcome.killed() as usize, count);
        prop_assert_eq!(army.num_dead(), outcome.killed() as usize);
    }

    #[test]
    fn remove_effects_clears_at_most_the_bearers(
        count in 1usize..20,
        frightened in 0usize..20,
        num in 0u32..30,
        seed in any::<u64>(),
    ) {
        let catalog = Catalog::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let frightened = frightened.min(count);
        let mut army = army_of(&vec![1; count], RoutPolicy::Figures);
        for index in 0..frightened {
            if let Some(soldier) = army.soldier_mut(index) {
                soldier.set_effect(ids::FRIGHT, &catalog);
            }
        }

        let removed = army.remove_effects(num, ids::FRIGHT, &catalog, &mut rng);
        prop_assert_eq!(removed as usize, frightened.min(num as usize));
        let still = army.soldiers().iter().filter(|s| s.has_effect(ids::FRIGHT)).count();
        prop_assert_eq!(still, frightened - removed as usize);
    }

    #[test]
    fn winning_settlement_conserves_equipment(
        count in 1usize..15,
        armed in 0usize..15,
        deaths in 0usize..15,
        percent in 0u32..=100,
    ) {
        let catalog = Catalog::standard();
        let config = RuleConfig {
            spoils_recovery_percent: percent,
            ..RuleConfig::default()
        };
        let ctx = BattleContext::new(&catalog, &config);
        let armed = armed.min(count);
        let deaths = deaths.min(count);

        let mut roster = Roster::new();
        let mut unit = Unit::new(UnitId(1), "Raiders", "Norse", UnitKind::Normal);
        unit.set_men(ids::VIKING, count as u32);
        roster.add_unit(unit);

        let soldiers = (0..count)
            .map(|i| {
                let mut soldier = Combatant::new("Raiders", UnitId(1), ids::VIKING);
                if i < armed {
                    soldier.weapon = Some(ids::SWORD);
                }
                soldier
            })
            .collect();
        let mut army = Army::from_combatants(UnitId(1), soldiers, RoutPolicy::Figures);
        for index in 0..deaths {
            army.damage_soldier(index);
        }

        let mut spoils = ItemList::new();
        let settlement = army.win(&ctx, &mut roster, &mut spoils);
        prop_assert_eq!(settlement.equipment_total(), armed as u64);
        prop_assert_eq!(settlement.survivors + settlement.fallen, count);
        prop_assert_eq!(spoils.total(), settlement.spoiled.total());

        let unit = roster.unit(UnitId(1)).unwrap();
        prop_assert_eq!(unit.men(ids::VIKING) as usize, count - deaths);
        prop_assert_eq!(unit.items.get(ids::SWORD) as u64, settlement.restored.total());
    }
}
