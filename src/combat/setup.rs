//! Equipping a combatant from its unit
//!
//! Setup consumes items from the unit one figure at a time: every item a
//! combatant takes is removed from the unit here and returned (or lost)
//! at settlement.

use crate::catalog::{Attacks, BattleItemFlag, ItemKind, SpecialFlag, WeaponDef, WeaponFlag};
use crate::combat::combatant::Combatant;
use crate::combat::BattleContext;
use crate::core::config::PrepareMode;
use crate::core::types::{AttackType, ItemId, SkillId, Terrain};
use crate::roster::unit::{Unit, UnitKind};
use crate::roster::Structure;

/// Defense bonus for fighting from a structure with room left
pub const FORTIFICATION_BONUS: i32 = 2;

/// Where and how a battle is fought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub terrain: Terrain,
    pub assassination: bool,
}

impl Deployment {
    pub fn open_field() -> Self {
        Self {
            terrain: Terrain::open(),
            assassination: false,
        }
    }
}

impl Combatant {
    /// Raise one figure of `race` from `unit`
    ///
    /// Monsters fight with their innate profile; men draw healing supplies,
    /// their combat spell, battle items, armor, a mount and a weapon from
    /// the unit inventory, in that order.
    pub fn setup(
        ctx: &BattleContext,
        unit: &mut Unit,
        race: ItemId,
        structure: Option<&mut Structure>,
        deployment: Deployment,
    ) -> Self {
        let catalog = ctx.catalog;
        let mut soldier = Combatant::new(&unit.name, unit.id, race);

        if let Some(structure) = structure {
            soldier.fortify(structure);
        }

        if let Some(monster) = catalog.monster(race) {
            let monster_name = &catalog.item(race).name;
            soldier.name = if unit.kind == UnitKind::WanderingMonster {
                format!("{} in {}", monster_name, unit.name)
            } else {
                format!("{} controlled by {}", monster_name, unit.name)
            };
            soldier.monster = true;
            soldier.illusion = catalog.item(race).is(ItemKind::Illusion);
            soldier.attack_skill = monster.attack_level;

            for attack_type in [AttackType::Combat, AttackType::Riding, AttackType::Ranged] {
                soldier.defense[attack_type.index()] += monster.defense[attack_type.index()];
            }
            for attack_type in [AttackType::Energy, AttackType::Spirit, AttackType::Weather] {
                let slot = &mut soldier.defense[attack_type.index()];
                *slot = (*slot).max(monster.defense[attack_type.index()]);
            }

            soldier.hits = monster.hits.max(1);
            soldier.max_hits = soldier.hits;
            soldier.attacks = Attacks::PerRound(monster.attacks.max(1) as u32);
            soldier.special = monster.special;
            soldier.special_level = monster.special_level;
            if ctx.config.monster_battle_regen {
                soldier.regen = monster.regen.max(0);
            }
            return soldier;
        }

        soldier.hits = catalog.race_hits(race);
        soldier.max_hits = soldier.hits;

        soldier.setup_healing(ctx, unit);
        soldier.setup_spell(ctx, unit);
        soldier.setup_battle_items(ctx, unit);
        soldier.setup_armor(ctx, unit, deployment.assassination);
        let riding_bonus = soldier.setup_mount(ctx, unit, deployment.terrain);
        soldier.setup_weapon(ctx, unit, riding_bonus);
        soldier
    }

    fn fortify(&mut self, structure: &mut Structure) {
        if structure.capacity == 0 {
            return;
        }
        self.building = Some(structure.kind);
        for defense in self.defense.iter_mut() {
            *defense += FORTIFICATION_BONUS;
        }
        if structure.runes != 0 {
            self.defense[AttackType::Energy.index()] = structure.runes;
            self.defense[AttackType::Spirit.index()] = structure.runes;
        }
        structure.capacity -= 1;
    }

    fn setup_healing(&mut self, ctx: &BattleContext, unit: &mut Unit) {
        let core = ctx.catalog.core();
        let rules = &ctx.catalog.healing;

        if unit.is_mage() {
            let level = unit.skill(core.magical_healing);
            if level > 0 {
                self.heal_type = (level as u32).min(rules.max_type());
                self.healing = level as u32 * ctx.config.heals_per_man;
                unit.practise(core.magical_healing);
                return;
            }
        }

        let level = unit.skill(core.healing);
        if let Some(herbs) = rules.herbs {
            if level > 0 && unit.items.get(herbs) > 0 {
                let wanted = level as u32 * ctx.config.heals_per_man;
                self.healing = unit.items.take(herbs, wanted);
                self.heal_type = 1;
                self.heal_item = Some(herbs);
                unit.practise(core.healing);
                return;
            }
        }

        if let Some(potion) = rules.potion {
            if unit.items.take(potion, 1) == 1 {
                self.healing = rules.potion_capacity;
                self.heal_type = 1;
                self.heal_item = Some(potion);
            }
        }
    }

    fn setup_spell(&mut self, ctx: &BattleContext, unit: &mut Unit) {
        if !unit.is_mage() {
            return;
        }
        let Some(spell) = unit.combat_spell else {
            return;
        };

        let level = unit.skill(spell);
        let special = ctx
            .catalog
            .skills
            .get(spell.0 as usize)
            .and_then(|skill| skill.combat_special);
        match special {
            Some(special) if level > 0 => {
                self.special = Some(special);
                self.special_level = level;
                unit.practise(spell);
            }
            _ => unit.combat_spell = None,
        }
    }

    fn setup_battle_items(&mut self, ctx: &BattleContext, unit: &mut Unit) {
        let catalog = ctx.catalog;
        for item in catalog.item_ids() {
            let Some(battle) = catalog.battle_item(item) else {
                continue;
            };
            // Weapons that double as battle items are handled with weapons
            if catalog.weapon(item).is_some() || unit.items.get(item) == 0 {
                continue;
            }

            let selected = match ctx.config.prepare {
                PrepareMode::None => true,
                PrepareMode::Normal => unit.ready_item.map_or(true, |ready| ready == item),
                PrepareMode::Strict => unit.ready_item == Some(item),
            };
            if !selected && !battle.has_flag(BattleItemFlag::Shield) {
                continue;
            }
            if battle.has_flag(BattleItemFlag::Special) && self.special.is_some() {
                continue;
            }
            if battle.has_flag(BattleItemFlag::MageOnly) && !unit.knows_magic() {
                continue;
            }

            unit.items.take(item, 1);
            self.battle_items.push(item);

            if battle.has_flag(BattleItemFlag::Invulnerability) {
                self.invulnerable = true;
            }
            if battle.has_flag(BattleItemFlag::Special) {
                self.special = battle.special;
                self.special_level = battle.level;
            }
            if battle.has_flag(BattleItemFlag::Shield) {
                let Some(special) = battle.special.map(|id| catalog.special(id)) else {
                    continue;
                };
                if !special.has_flag(SpecialFlag::Shield) {
                    continue;
                }
                for attack_type in special.shield_types() {
                    let slot = &mut self.defense[attack_type.index()];
                    *slot = (*slot).max(battle.level);
                }
            }
        }
    }

    fn setup_armor(&mut self, ctx: &BattleContext, unit: &mut Unit, assassination: bool) {
        let catalog = ctx.catalog;
        let candidates = unit
            .ready_armor
            .clone()
            .into_iter()
            .chain(catalog.item_ids().filter(|item| catalog.armor(*item).is_some()));

        for item in candidates {
            let Some(armor) = catalog.armor(item) else {
                continue;
            };
            if assassination && !armor.usable_in_assassination {
                continue;
            }
            if unit.items.take(item, 1) == 1 {
                self.armor = Some(item);
                return;
            }
        }
    }

    /// Mount up if the terrain allows it, returning the riding bonus
    fn setup_mount(&mut self, ctx: &BattleContext, unit: &mut Unit, terrain: Terrain) -> i32 {
        if !terrain.allows_mounts() {
            return 0;
        }

        let catalog = ctx.catalog;
        for item in catalog.item_ids() {
            let Some(mount) = catalog.mount(item) else {
                continue;
            };
            if unit.items.get(item) == 0 {
                continue;
            }

            let def = catalog.item(item);
            if terrain.flying_mounts {
                if def.fly == 0 && !terrain.riding_mounts {
                    continue;
                }
            } else if def.ride == 0 {
                continue;
            }

            let mut bonus = unit.skill(mount.skill);
            if bonus < mount.min_bonus {
                continue;
            }
            bonus = bonus.min(mount.max_bonus);
            if def.fly > 0 && !terrain.flying_mounts {
                bonus = bonus.min(mount.max_hampered_bonus);
            }

            unit.items.take(item, 1);
            self.riding = Some(item);
            self.defense[AttackType::Riding.index()] += bonus;
            return bonus;
        }
        0
    }

    fn setup_weapon(&mut self, ctx: &BattleContext, unit: &mut Unit, riding_bonus: i32) {
        let catalog = ctx.catalog;
        let combat = catalog.core().combat;
        let candidates = unit
            .ready_weapons
            .clone()
            .into_iter()
            .chain(catalog.item_ids().filter(|item| catalog.weapon(*item).is_some()));

        let mut attack_bonus = unit.skill(combat) + riding_bonus;
        let mut defense_bonus = attack_bonus;

        for item in candidates {
            let Some(weapon) = catalog.weapon(item) else {
                continue;
            };
            if unit.items.get(item) == 0 {
                continue;
            }
            let Some(level) = weapon_skill(weapon, self.is_mounted(), unit, combat) else {
                continue;
            };

            attack_bonus = level + weapon.attack_bonus;
            defense_bonus = if weapon.has_flag(WeaponFlag::NoAttackerSkill) {
                weapon.defense_bonus
            } else {
                level + weapon.defense_bonus
            };
            if weapon.has_flag(WeaponFlag::RidingBonus) {
                attack_bonus += riding_bonus;
            }
            if weapon.has_flag(WeaponFlag::RidingBonus)
                || weapon.has_flag(WeaponFlag::RidingBonusDefense)
            {
                defense_bonus += riding_bonus;
            }

            unit.items.take(item, 1);
            self.weapon = Some(item);
            self.attack_type = weapon.attack_type;
            self.attacks = weapon.rate.resolve(level);

            if self.special.is_none() {
                if let Some(battle) = catalog.battle_item(item) {
                    self.special = battle.special;
                    self.special_level = battle.level;
                }
            }
            break;
        }

        unit.practise(combat);
        if riding_bonus != 0 {
            unit.practise(catalog.core().riding);
        }

        self.attack_skill += attack_bonus;
        self.defense[AttackType::Combat.index()] += defense_bonus;
    }
}

/// Skill level a unit wields `weapon` at, or `None` if it cannot use it
///
/// Weapons without a skill requirement use the combat skill.
fn weapon_skill(
    weapon: &WeaponDef,
    mounted: bool,
    unit: &mut Unit,
    combat: SkillId,
) -> Option<i32> {
    if !mounted && weapon.has_flag(WeaponFlag::NoFoot) {
        return None;
    }
    if mounted && weapon.has_flag(WeaponFlag::NoMount) {
        return None;
    }
    if !weapon.has_flag(WeaponFlag::NeedSkill) {
        return Some(unit.skill(combat));
    }

    let base = weapon.base_skill.map_or(0, |skill| unit.skill(skill));
    let alternative = weapon.or_skill.map_or(0, |skill| unit.skill(skill));
    let (level, used) = if alternative > base {
        (alternative, weapon.or_skill)
    } else {
        (base, weapon.base_skill)
    };
    if let Some(skill) = used {
        unit.practise(skill);
    }

    (level > 0).then_some(level)
}
