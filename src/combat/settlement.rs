//! End-of-battle settlement
//!
//! Each of `win`, `lose` and `tie` consumes the army, visits every slot
//! exactly once and writes the results back to the roster. Every item a
//! combatant held ends up in exactly one of `restored`, `spoiled` or
//! `discarded`.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combat::army::Army;
use crate::combat::combatant::{Combatant, Survival};
use crate::combat::BattleContext;
use crate::core::types::UnitId;
use crate::roster::items::ItemList;
use crate::roster::Roster;

/// What settling one army did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Equipment handed back to units
    pub restored: ItemList,
    /// Fallen combatants' equipment added to the spoils pool
    pub spoiled: ItemList,
    /// Equipment lost for good
    pub discarded: ItemList,
    /// Spoils created by fallen wandering monsters
    pub generated: ItemList,
    pub survivors: usize,
    pub fallen: usize,
    /// One entry per survivor, in slot order, for sharing out spoils
    pub recipients: Vec<UnitId>,
    /// Figures lost per unit
    pub losses: BTreeMap<UnitId, u32>,
}

impl Settlement {
    /// Everything the army's combatants held when the battle ended
    pub fn equipment_total(&self) -> u64 {
        self.restored.total() + self.spoiled.total() + self.discarded.total()
    }

    fn survived(&mut self, soldier: &Combatant, survival: Survival, roster: &mut Roster, ctx: &BattleContext) {
        self.survivors += 1;
        self.recipients.push(soldier.unit);
        match roster.unit_mut(soldier.unit) {
            Some(unit) => {
                let held = soldier.restore_equipment(unit, ctx.catalog);
                self.restored.merge(&held);
                soldier.mark_survived(survival, unit);
            }
            None => self.discarded.merge(&soldier.equipment(ctx.catalog)),
        }
    }

    fn fell(&mut self, soldier: &Combatant, roster: &mut Roster) {
        self.fallen += 1;
        *self.losses.entry(soldier.unit).or_default() += 1;
        if let Some(unit) = roster.unit_mut(soldier.unit) {
            soldier.mark_killed(unit);
        }
    }
}

impl Army {
    fn win_survival(&self) -> Survival {
        if self.num_dead() > 0 {
            Survival::WonWithLosses
        } else {
            Survival::WonWithoutLosses
        }
    }

    /// Settle the winning side
    ///
    /// The fallen's equipment goes into `spoils`, scaled down by the
    /// configured recovery percentage; the remainder is lost.
    pub fn win(self, ctx: &BattleContext, roster: &mut Roster, spoils: &mut ItemList) -> Settlement {
        let survival = self.win_survival();
        let mut settlement = Settlement::default();
        let mut fallen_gear = ItemList::new();

        for soldier in &self.soldiers {
            if soldier.is_alive() {
                settlement.survived(soldier, survival, roster, ctx);
            } else {
                fallen_gear.merge(&soldier.equipment(ctx.catalog));
                settlement.fell(soldier, roster);
            }
        }

        let percent = ctx.config.spoils_recovery_percent.min(100) as u64;
        for (item, num) in fallen_gear.iter() {
            let recovered = (num as u64 * percent / 100) as u32;
            settlement.spoiled.add(item, recovered);
            settlement.discarded.add(item, num - recovered);
        }
        spoils.merge(&settlement.spoiled);

        info!(
            leader = self.leader.0,
            survivors = settlement.survivors,
            fallen = settlement.fallen,
            "army wins"
        );
        settlement
    }

    /// Settle the losing side
    ///
    /// The fallen's equipment is lost; fallen wandering monsters add their
    /// own spoils to `spoils`.
    pub fn lose<R: Rng + ?Sized>(
        self,
        ctx: &BattleContext,
        roster: &mut Roster,
        spoils: &mut ItemList,
        rng: &mut R,
    ) -> Settlement {
        let mut settlement = Settlement::default();

        for soldier in &self.soldiers {
            if soldier.is_alive() {
                settlement.survived(soldier, Survival::Lost, roster, ctx);
                continue;
            }

            let wandering = roster
                .unit(soldier.unit)
                .filter(|unit| unit.is_wandering_monster())
                .map(|unit| unit.free);
            if let (Some(free), true) = (wandering, soldier.monster) {
                Army::get_mon_spoils(ctx, &mut settlement.generated, soldier.race, free, rng);
            }
            settlement.discarded.merge(&soldier.equipment(ctx.catalog));
            settlement.fell(soldier, roster);
        }
        spoils.merge(&settlement.generated);

        info!(
            leader = self.leader.0,
            survivors = settlement.survivors,
            fallen = settlement.fallen,
            "army loses"
        );
        settlement
    }

    /// Settle a side in an indecisive battle: nobody loots, everything
    /// goes home
    pub fn tie(self, ctx: &BattleContext, roster: &mut Roster) -> Settlement {
        let mut settlement = Settlement::default();

        for soldier in &self.soldiers {
            if soldier.is_alive() {
                settlement.survived(soldier, Survival::Tied, roster, ctx);
                continue;
            }
            match roster.unit_mut(soldier.unit) {
                Some(unit) => {
                    let held = soldier.restore_equipment(unit, ctx.catalog);
                    settlement.restored.merge(&held);
                }
                None => settlement.discarded.merge(&soldier.equipment(ctx.catalog)),
            }
            settlement.fell(soldier, roster);
        }

        info!(
            leader = self.leader.0,
            survivors = settlement.survivors,
            fallen = settlement.fallen,
            "battle tied"
        );
        settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ids, Catalog};
    use crate::core::config::{RoutPolicy, RuleConfig};
    use crate::roster::unit::{GuardStatus, Unit, UnitKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn swordsmen(n: u32) -> (Roster, Army) {
        let mut unit = Unit::new(UnitId(1), "Raiders", "Norse", UnitKind::Normal);
        unit.set_men(ids::VIKING, n);
        let mut roster = Roster::new();
        roster.add_unit(unit);

        let soldiers = (0..n)
            .map(|_| {
                let mut soldier = Combatant::new("Raiders", UnitId(1), ids::VIKING);
                soldier.weapon = Some(ids::SWORD);
                soldier.armor = Some(ids::LEATHER);
                soldier
            })
            .collect();
        (roster, Army::from_combatants(UnitId(1), soldiers, RoutPolicy::Figures))
    }

    #[test]
    fn test_win_spoils_fallen_equipment() {
        let catalog = Catalog::standard();
        let config = RuleConfig::default();
        let ctx = BattleContext::new(&catalog, &config);
        let (mut roster, mut army) = swordsmen(3);
        army.damage_soldier(2);

        let mut spoils = ItemList::new();
        let settlement = army.win(&ctx, &mut roster, &mut spoils);

        assert_eq!(settlement.survivors, 2);
        assert_eq!(settlement.fallen, 1);
        assert_eq!(settlement.restored.get(ids::SWORD), 2);
        assert_eq!(settlement.spoiled.get(ids::SWORD), 1);
        assert_eq!(spoils.get(ids::LEATHER), 1);
        assert_eq!(settlement.equipment_total(), 6);
        assert_eq!(settlement.recipients, vec![UnitId(1), UnitId(1)]);

        let unit = roster.unit(UnitId(1)).unwrap();
        assert_eq!(unit.men(ids::VIKING), 2);
        assert_eq!(unit.losses, 1);
        assert_eq!(unit.items.get(ids::SWORD), 2);
        assert!(!unit.can_attack);
        assert!(unit.no_move);
    }

    #[test]
    fn test_win_recovery_percentage() {
        let catalog = Catalog::standard();
        let config = RuleConfig {
            spoils_recovery_percent: 50,
            ..RuleConfig::default()
        };
        let ctx = BattleContext::new(&catalog, &config);
        let (mut roster, mut army) = swordsmen(4);
        for i in 0..3 {
            army.damage_soldier(i);
        }

        let mut spoils = ItemList::new();
        let settlement = army.win(&ctx, &mut roster, &mut spoils);
        assert_eq!(settlement.spoiled.get(ids::SWORD), 1);
        assert_eq!(settlement.discarded.get(ids::SWORD), 2);
        assert_eq!(settlement.equipment_total(), 8);
    }

    #[test]
    fn test_clean_win_leaves_unit_free() {
        let catalog = Catalog::standard();
        let config = RuleConfig::default();
        let ctx = BattleContext::new(&catalog, &config);
        let (mut roster, army) = swordsmen(2);
        roster.unit_mut(UnitId(1)).unwrap().advancing = true;

        let mut spoils = ItemList::new();
        army.win(&ctx, &mut roster, &mut spoils);
        let unit = roster.unit(UnitId(1)).unwrap();
        assert!(unit.can_attack);
        assert!(!unit.no_move);
        assert!(!unit.advancing);
        assert!(spoils.is_empty());
    }

    #[test]
    fn test_loss_discards_fallen_equipment() {
        let catalog = Catalog::standard();
        let config = RuleConfig::default();
        let ctx = BattleContext::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (mut roster, mut army) = swordsmen(2);
        roster.unit_mut(UnitId(1)).unwrap().guard = GuardStatus::Guard;
        army.damage_soldier(0);

        let mut spoils = ItemList::new();
        let settlement = army.lose(&ctx, &mut roster, &mut spoils, &mut rng);
        assert_eq!(settlement.discarded.get(ids::SWORD), 1);
        assert!(settlement.spoiled.is_empty());
        assert!(spoils.is_empty());

        let unit = roster.unit(UnitId(1)).unwrap();
        assert_eq!(unit.guard, GuardStatus::None);
        assert_eq!(unit.men(ids::VIKING), 1);
    }

    #[test]
    fn test_tie_returns_everything() {
        let catalog = Catalog::standard();
        let config = RuleConfig::default();
        let ctx = BattleContext::new(&catalog, &config);
        let (mut roster, mut army) = swordsmen(3);
        army.damage_soldier(1);

        let settlement = army.tie(&ctx, &mut roster);
        assert_eq!(settlement.restored.get(ids::SWORD), 3);
        assert!(settlement.discarded.is_empty());
        let unit = roster.unit(UnitId(1)).unwrap();
        assert_eq!(unit.items.get(ids::LEATHER), 3);
        assert_eq!(unit.men(ids::VIKING), 2);
    }

    #[test]
    fn test_fallen_wandering_monsters_leave_spoils() {
        let catalog = Catalog::standard();
        let config = RuleConfig::default();
        let ctx = BattleContext::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let mut trolls = Unit::new(UnitId(9), "Bridge", "Monsters", UnitKind::WanderingMonster);
        trolls.items.set(ids::TROLL, 5);
        let mut roster = Roster::new();
        roster.add_unit(trolls);

        let soldiers = (0..5)
            .map(|_| {
                let mut troll = Combatant::new("troll", UnitId(9), ids::TROLL).with_hits(1);
                troll.monster = true;
                troll
            })
            .collect();
        let mut army = Army::from_combatants(UnitId(9), soldiers, RoutPolicy::Figures);
        for i in 0..5 {
            army.damage_soldier(i);
        }

        let mut spoils = ItemList::new();
        let settlement = army.lose(&ctx, &mut roster, &mut spoils, &mut rng);
        assert_eq!(settlement.fallen, 5);
        assert_eq!(spoils, settlement.generated);
        assert!(spoils.get(ids::SILVER) > 0);
        assert!(!roster.unit(UnitId(9)).unwrap().is_alive(&catalog));
    }
}
