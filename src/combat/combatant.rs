//! A single fighting figure inside an army
//!
//! Combatants are built from unit inventories when an army musters (see
//! `setup.rs`), mutated every round, and settled exactly once when the
//! battle ends.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Attacks, Catalog, WeaponDef, WeaponFlag, WeaponLength};
use crate::combat::effects::EffectSet;
use crate::core::types::{
    AttackType, DefenseSkills, EffectId, ItemId, SpecialId, StructureKind, UnitId, WeaponClass,
};
use crate::roster::items::ItemList;
use crate::roster::unit::{GuardStatus, Unit};

/// Which rank a combatant fights in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Front,
    Rear,
}

/// How a surviving combatant's side fared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Survival {
    WonWithoutLosses,
    WonWithLosses,
    Lost,
    Tied,
}

/// Base defense of a figure before equipment
pub const BASE_DEFENSE: DefenseSkills = [0, -2, -2, -2, 0, 0];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    /// Originating unit, used only to give equipment back
    pub unit: UnitId,
    pub race: ItemId,
    pub monster: bool,
    pub illusion: bool,
    pub riding: Option<ItemId>,
    pub building: Option<StructureKind>,

    // Healing
    /// Patients this figure can still treat
    pub healing: u32,
    pub heal_type: u32,
    pub heal_item: Option<ItemId>,
    pub can_be_healed: bool,
    pub regen: i32,

    // Attack
    pub weapon: Option<ItemId>,
    pub attack_type: AttackType,
    pub attack_skill: i32,
    pub attacks: Attacks,
    pub special: Option<SpecialId>,
    pub special_level: i32,

    // Defense
    pub defense: DefenseSkills,
    pub armor: Option<ItemId>,
    pub hits: i32,
    pub max_hits: i32,
    pub damage: i32,

    /// Battle items in use, returned at settlement
    pub battle_items: Vec<ItemId>,
    pub invulnerable: bool,
    pub effects: EffectSet,

    pub rank: Rank,
    /// Has not attacked yet this round
    pub ready: bool,
}

impl Combatant {
    /// An unequipped one-hit figure
    pub fn new(name: &str, unit: UnitId, race: ItemId) -> Self {
        Self {
            name: name.to_string(),
            unit,
            race,
            monster: false,
            illusion: false,
            riding: None,
            building: None,
            healing: 0,
            heal_type: 0,
            heal_item: None,
            can_be_healed: true,
            regen: 0,
            weapon: None,
            attack_type: AttackType::Combat,
            attack_skill: 0,
            attacks: Attacks::PerRound(1),
            special: None,
            special_level: 0,
            defense: BASE_DEFENSE,
            armor: None,
            hits: 1,
            max_hits: 1,
            damage: 0,
            battle_items: Vec::new(),
            invulnerable: false,
            effects: EffectSet::new(),
            rank: Rank::Front,
            ready: true,
        }
    }

    pub fn with_hits(mut self, hits: i32) -> Self {
        self.hits = hits.max(1);
        self.max_hits = self.hits;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hits > 0
    }

    pub fn is_mounted(&self) -> bool {
        self.riding.is_some()
    }

    pub fn is_damaged(&self) -> bool {
        self.is_alive() && self.hits < self.max_hits
    }

    pub fn weapon_def<'c>(&self, catalog: &'c Catalog) -> Option<&'c WeaponDef> {
        self.weapon.and_then(|weapon| catalog.weapon(weapon))
    }

    /// Length this figure defends with (unarmed counts as normal)
    pub fn defending_length(&self, catalog: &Catalog) -> WeaponLength {
        self.weapon_def(catalog)
            .map_or(WeaponLength::Normal, WeaponDef::length)
    }

    /// Flags, attack type, mount bonus and class of this figure's weapon
    /// attacks; an unarmed figure fights short with its bare hands
    pub fn weapon_attack(&self, catalog: &Catalog) -> WeaponAttack {
        match self.weapon_def(catalog) {
            Some(weapon) => WeaponAttack {
                flags: weapon.flags.clone(),
                attack_type: weapon.attack_type,
                mount_bonus: weapon.mount_bonus,
                class: weapon.class,
            },
            None => WeaponAttack {
                flags: vec![WeaponFlag::Short],
                attack_type: AttackType::Combat,
                mount_bonus: 0,
                class: WeaponClass::Slashing,
            },
        }
    }

    pub fn has_effect(&self, effect: EffectId) -> bool {
        self.effects.contains(effect)
    }

    /// Apply an effect's modifiers, clear whatever it cancels, and record it
    /// unless it is a no-set effect
    pub fn set_effect(&mut self, effect: EffectId, catalog: &Catalog) {
        let def = catalog.effect(effect);
        self.attack_skill += def.attack;
        for modifier in &def.defense_mods {
            self.defense[modifier.attack_type.index()] += modifier.value;
        }

        if let Some(cancelled) = def.cancels {
            self.clear_effect(cancelled, catalog);
        }

        if !def.no_set {
            self.effects.insert(effect);
        }
    }

    /// Revert an effect's modifiers; does nothing if the effect is absent
    pub fn clear_effect(&mut self, effect: EffectId, catalog: &Catalog) -> bool {
        if !self.effects.remove(effect) {
            return false;
        }
        let def = catalog.effect(effect);
        self.attack_skill -= def.attack;
        for modifier in &def.defense_mods {
            self.defense[modifier.attack_type.index()] -= modifier.value;
        }
        true
    }

    /// Clear every one-shot effect, returning how many were cleared
    pub fn clear_one_shot_effects(&mut self, catalog: &Catalog) -> usize {
        let one_shots: Vec<EffectId> = self
            .effects
            .iter()
            .filter(|effect| catalog.effect(*effect).one_shot)
            .collect();
        for effect in &one_shots {
            self.clear_effect(*effect, catalog);
        }
        one_shots.len()
    }

    /// Roll the worn armor against a hit of `class`
    pub fn armor_saves<R: Rng + ?Sized>(
        &self,
        class: WeaponClass,
        catalog: &Catalog,
        rng: &mut R,
    ) -> bool {
        match self.armor.and_then(|armor| catalog.armor(armor)) {
            Some(armor) => armor.roll_save(class, rng),
            None => false,
        }
    }

    /// Everything this figure took from its unit and still holds
    pub fn equipment(&self, catalog: &Catalog) -> ItemList {
        let mut held = ItemList::new();
        for item in [self.weapon, self.armor, self.riding].into_iter().flatten() {
            held.add(item, 1);
        }
        for item in &self.battle_items {
            held.add(*item, 1);
        }
        if let Some(item) = self.heal_item {
            let healing = &catalog.healing;
            if Some(item) == healing.potion {
                held.add(item, self.healing / healing.potion_capacity.max(1));
            } else {
                held.add(item, self.healing);
            }
        }
        held
    }

    /// Give everything still held back to the originating unit
    pub fn restore_equipment(&self, unit: &mut Unit, catalog: &Catalog) -> ItemList {
        let held = self.equipment(catalog);
        unit.items.merge(&held);
        held
    }

    /// Terminal transition for a figure that lived through the battle
    pub fn mark_survived(&self, survival: Survival, unit: &mut Unit) {
        match survival {
            Survival::Lost => {
                unit.can_attack = false;
                if !self.invulnerable
                    && matches!(unit.guard, GuardStatus::Guard | GuardStatus::Set)
                {
                    unit.guard = GuardStatus::None;
                }
            }
            Survival::WonWithoutLosses => unit.advancing = false,
            Survival::WonWithLosses | Survival::Tied => {
                unit.advancing = false;
                unit.can_attack = false;
                unit.no_move = true;
            }
        }
    }

    /// Terminal transition for a fallen figure: it leaves its unit
    pub fn mark_killed(&self, unit: &mut Unit) {
        let men = unit.men(self.race);
        unit.set_men(self.race, men.saturating_sub(1));
        unit.losses += 1;
    }
}

/// Parameters of one figure's weapon attacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponAttack {
    pub flags: Vec<WeaponFlag>,
    pub attack_type: AttackType,
    pub mount_bonus: i32,
    pub class: WeaponClass,
}

impl WeaponAttack {
    pub fn is_ranged(&self) -> bool {
        self.flags.contains(&WeaponFlag::Ranged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use crate::roster::unit::UnitKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn viking() -> Combatant {
        Combatant::new("Raiders", UnitId(1), ids::VIKING)
    }

    #[test]
    fn test_effect_modifiers_apply_and_revert() {
        let catalog = Catalog::standard();
        let mut soldier = viking();
        soldier.attack_skill = 3;

        soldier.set_effect(ids::FRIGHT, &catalog);
        assert!(soldier.has_effect(ids::FRIGHT));
        assert_eq!(soldier.attack_skill, 1);
        assert_eq!(soldier.defense[AttackType::Combat.index()], -2);

        assert!(soldier.clear_effect(ids::FRIGHT, &catalog));
        assert_eq!(soldier.attack_skill, 3);
        assert_eq!(soldier.defense, BASE_DEFENSE);
    }

    #[test]
    fn test_clearing_absent_effect_changes_nothing() {
        let catalog = Catalog::standard();
        let mut soldier = viking();
        assert!(!soldier.clear_effect(ids::FRIGHT, &catalog));
        assert_eq!(soldier.attack_skill, 0);
        assert_eq!(soldier.defense, BASE_DEFENSE);
    }

    #[test]
    fn test_cancelling_effect_clears_target() {
        let catalog = Catalog::standard();
        let mut soldier = viking();
        soldier.set_effect(ids::FRIGHT, &catalog);
        soldier.set_effect(ids::COURAGE, &catalog);

        assert!(!soldier.has_effect(ids::FRIGHT));
        assert!(soldier.has_effect(ids::COURAGE));
        // -2 from fright reverted, +1 from courage
        assert_eq!(soldier.attack_skill, 1);
        assert_eq!(soldier.defense, BASE_DEFENSE);
    }

    #[test]
    fn test_one_shot_effects_cleared() {
        let catalog = Catalog::standard();
        let mut soldier = viking();
        soldier.set_effect(ids::DAZZLE, &catalog);
        soldier.set_effect(ids::FRIGHT, &catalog);

        assert_eq!(soldier.clear_one_shot_effects(&catalog), 1);
        assert!(!soldier.has_effect(ids::DAZZLE));
        assert!(soldier.has_effect(ids::FRIGHT));
        assert_eq!(soldier.clear_one_shot_effects(&catalog), 0);
    }

    #[test]
    fn test_unarmored_never_saves() {
        let catalog = Catalog::standard();
        let soldier = viking();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((0..100).all(|_| !soldier.armor_saves(WeaponClass::Slashing, &catalog, &mut rng)));
    }

    #[test]
    fn test_unarmed_attack_is_short() {
        let catalog = Catalog::standard();
        let soldier = viking();
        let attack = soldier.weapon_attack(&catalog);
        assert_eq!(attack.flags, vec![WeaponFlag::Short]);
        assert_eq!(attack.attack_type, AttackType::Combat);
        assert_eq!(soldier.defending_length(&catalog), WeaponLength::Normal);
    }

    #[test]
    fn test_equipment_includes_unused_healing() {
        let catalog = Catalog::standard();
        let mut soldier = viking();
        soldier.weapon = Some(ids::SWORD);
        soldier.battle_items.push(ids::AMULET);
        soldier.heal_item = Some(ids::HERBS);
        soldier.healing = 3;

        let held = soldier.equipment(&catalog);
        assert_eq!(held.get(ids::SWORD), 1);
        assert_eq!(held.get(ids::AMULET), 1);
        assert_eq!(held.get(ids::HERBS), 3);

        soldier.heal_item = Some(ids::HEALING_POTION);
        soldier.healing = 9;
        assert_eq!(soldier.equipment(&catalog).get(ids::HEALING_POTION), 0);
        soldier.healing = 10;
        assert_eq!(soldier.equipment(&catalog).get(ids::HEALING_POTION), 1);
    }

    #[test]
    fn test_lost_guard_stands_down_unless_invulnerable() {
        let mut unit = Unit::new(UnitId(1), "Watch", "City", UnitKind::Guard);
        unit.guard = GuardStatus::Guard;

        let mut soldier = viking();
        soldier.invulnerable = true;
        soldier.mark_survived(Survival::Lost, &mut unit);
        assert_eq!(unit.guard, GuardStatus::Guard);
        assert!(!unit.can_attack);

        soldier.invulnerable = false;
        soldier.mark_survived(Survival::Lost, &mut unit);
        assert_eq!(unit.guard, GuardStatus::None);
    }

    #[test]
    fn test_killed_figure_leaves_unit() {
        let mut unit = Unit::new(UnitId(1), "Raiders", "Norse", UnitKind::Normal);
        unit.set_men(ids::VIKING, 2);
        viking().mark_killed(&mut unit);
        assert_eq!(unit.men(ids::VIKING), 1);
        assert_eq!(unit.losses, 1);
    }
}
