//! Loot: what fallen monsters leave behind and who picks it up

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, ItemKind};
use crate::combat::army::Army;
use crate::combat::BattleContext;
use crate::core::types::{ItemId, UnitId};
use crate::roster::items::ItemList;
use crate::roster::Roster;

/// How a spoils pool was shared out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpoilsDistribution {
    pub awarded: BTreeMap<UnitId, ItemList>,
    /// Items no survivor could carry
    pub unclaimed: ItemList,
}

impl Army {
    /// Add the spoils one fallen wandering monster leaves behind
    ///
    /// `free` is the number of turns the monster has been loose; while
    /// freedom counts, recently released monsters yield less or nothing.
    pub fn get_mon_spoils<R: Rng + ?Sized>(
        ctx: &BattleContext,
        spoils: &mut ItemList,
        monster: ItemId,
        free: u32,
        rng: &mut R,
    ) {
        let Some(def) = ctx.catalog.monster(monster) else {
            return;
        };
        let no_spoils = ctx.config.monster_no_spoils;
        let recovery = ctx.config.monster_spoils_recovery;
        if no_spoils > 0 && free >= recovery {
            return;
        }
        let scale = |value: u32| -> u32 {
            if no_spoils > 0 && free > 0 {
                (value as u64 * (recovery - free) as u64 / recovery as u64) as u32
            } else {
                value
            }
        };

        let silver = scale(def.silver);
        if let Some(coin) = ctx.catalog.silver() {
            if silver > 0 {
                spoils.add(coin, rng.gen_range(0..silver));
            }
        }

        let Some(mut kind) = def.spoils else {
            return;
        };
        if kind == ItemKind::Normal && rng.gen_bool(0.5) {
            kind = ItemKind::Trade;
        }

        let candidates: Vec<ItemId> = spoil_candidates(ctx.catalog, kind).collect();
        if candidates.is_empty() {
            return;
        }
        let item = candidates[rng.gen_range(0..candidates.len())];
        let base_price = ctx.catalog.item(item).base_price;

        let value = match def.silver.saturating_mul(2) {
            0 => 0,
            top => scale(rng.gen_range(0..top)),
        };
        let num = (value + rng.gen_range(0..base_price)) / base_price;
        spoils.add(item, num);
        debug!(monster = %ctx.catalog.item(monster).name, item = %ctx.catalog.item(item).name, num, "monster spoils");
    }
}

/// Items of `kind` that can turn up as monster spoils
fn spoil_candidates(catalog: &Catalog, kind: ItemKind) -> impl Iterator<Item = ItemId> + '_ {
    catalog.item_ids().filter(move |id| {
        let item = catalog.item(*id);
        item.is(kind) && !item.is(ItemKind::Special) && !item.disabled && item.base_price > 0
    })
}

/// Hand `spoils` out one item at a time, round-robin over `recipients`
///
/// `recipients` holds one entry per surviving combatant, so a unit with
/// more survivors gets a bigger share. A recipient whose spoils policy
/// refuses an item is skipped; the turn passes on to the next one.
pub fn distribute_spoils(
    spoils: &ItemList,
    recipients: &[UnitId],
    roster: &mut Roster,
    catalog: &Catalog,
) -> SpoilsDistribution {
    let mut distribution = SpoilsDistribution::default();
    let n = recipients.len();
    let mut cursor = 0;

    for (item, num) in spoils.iter() {
        let Some(def) = catalog.get_item(item) else {
            distribution.unclaimed.add(item, num);
            continue;
        };

        let mut left = num;
        let mut refusals = 0;
        while left > 0 && refusals < n {
            let unit_id = recipients[cursor];
            cursor = (cursor + 1) % n;

            match roster.unit_mut(unit_id) {
                Some(unit) if unit.can_get_spoil(def) => {
                    unit.items.add(item, 1);
                    distribution.awarded.entry(unit_id).or_default().add(item, 1);
                    left -= 1;
                    refusals = 0;
                }
                _ => refusals += 1,
            }
        }
        distribution.unclaimed.add(item, left);
    }

    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use crate::core::config::RuleConfig;
    use crate::roster::unit::{SpoilsPolicy, Unit, UnitKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_units() -> Roster {
        let mut roster = Roster::new();
        roster.add_unit(Unit::new(UnitId(1), "Raiders", "Norse", UnitKind::Normal));
        let mut porters = Unit::new(UnitId(2), "Scouts", "Norse", UnitKind::Normal);
        porters.spoils = SpoilsPolicy::Weightless;
        roster.add_unit(porters);
        roster
    }

    #[test]
    fn test_round_robin_shares() {
        let catalog = Catalog::standard();
        let mut roster = two_units();
        let mut spoils = ItemList::new();
        spoils.add(ids::SILVER, 5);

        let result = distribute_spoils(&spoils, &[UnitId(1), UnitId(2)], &mut roster, &catalog);
        assert_eq!(result.awarded[&UnitId(1)].get(ids::SILVER), 3);
        assert_eq!(result.awarded[&UnitId(2)].get(ids::SILVER), 2);
        assert!(result.unclaimed.is_empty());
        assert_eq!(roster.unit(UnitId(2)).unwrap().items.get(ids::SILVER), 2);
    }

    #[test]
    fn test_refused_items_go_to_willing_units() {
        let catalog = Catalog::standard();
        let mut roster = two_units();
        let mut spoils = ItemList::new();
        spoils.add(ids::IRON, 4);

        let result = distribute_spoils(&spoils, &[UnitId(2), UnitId(1)], &mut roster, &catalog);
        assert_eq!(result.awarded[&UnitId(1)].get(ids::IRON), 4);
        assert!(!result.awarded.contains_key(&UnitId(2)));
    }

    #[test]
    fn test_nobody_to_carry() {
        let catalog = Catalog::standard();
        let mut roster = two_units();
        let mut spoils = ItemList::new();
        spoils.add(ids::IRON, 4);

        let result = distribute_spoils(&spoils, &[UnitId(2)], &mut roster, &catalog);
        assert_eq!(result.unclaimed.get(ids::IRON), 4);

        let result = distribute_spoils(&spoils, &[], &mut roster, &catalog);
        assert_eq!(result.unclaimed.get(ids::IRON), 4);
    }

    #[test]
    fn test_monster_spoils_bounded_by_silver() {
        let catalog = Catalog::standard();
        let config = RuleConfig::default();
        let ctx = BattleContext::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        for _ in 0..50 {
            let mut spoils = ItemList::new();
            Army::get_mon_spoils(&ctx, &mut spoils, ids::WOLF, 0, &mut rng);
            assert!(spoils.get(ids::SILVER) < 10);
            // Wolves drop trade goods worth less than twice their silver
            for (item, num) in spoils.iter().filter(|(item, _)| *item != ids::SILVER) {
                let def = catalog.item(item);
                assert!(def.is(ItemKind::Trade));
                assert!(num * def.base_price < 20 + def.base_price);
            }
        }
    }

    #[test]
    fn test_freshly_released_monster_yields_nothing() {
        let catalog = Catalog::standard();
        let config = RuleConfig {
            monster_no_spoils: 5,
            monster_spoils_recovery: 10,
            ..RuleConfig::default()
        };
        let ctx = BattleContext::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut spoils = ItemList::new();
        Army::get_mon_spoils(&ctx, &mut spoils, ids::TROLL, 10, &mut rng);
        assert!(spoils.is_empty());

        for _ in 0..20 {
            Army::get_mon_spoils(&ctx, &mut spoils, ids::TROLL, 9, &mut rng);
        }
        // A tenth of 300 silver, at most 29 per troll
        assert!(spoils.get(ids::SILVER) <= 20 * 29);
    }
}
