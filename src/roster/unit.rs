//! Units: the groups of men and monsters armies are drawn from

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ItemDef};
use crate::core::types::{ItemId, SkillId, UnitId};
use crate::roster::items::ItemList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitKind {
    #[default]
    Normal,
    Mage,
    GuardMage,
    Apprentice,
    /// Monsters roaming free; they drop spoils when killed
    WanderingMonster,
    GuardMonster,
    /// Town guards
    Guard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuardStatus {
    #[default]
    None,
    Guard,
    /// Will start guarding at the end of the turn
    Set,
    Avoid,
    Advance,
}

/// Which battle spoils a unit will pick up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpoilsPolicy {
    #[default]
    All,
    /// Only weightless items
    Weightless,
    /// Only items that can fly their own weight
    Flying,
    /// Only items that can walk their own weight
    Walking,
    /// Only items that can ride their own weight
    Riding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub faction: String,
    #[serde(default)]
    pub kind: UnitKind,
    #[serde(default)]
    pub items: ItemList,
    #[serde(default)]
    pub skills: AHashMap<SkillId, i32>,
    /// Fights from the rear rank
    #[serde(default)]
    pub behind: bool,
    #[serde(default)]
    pub spoils: SpoilsPolicy,
    #[serde(default)]
    pub guard: GuardStatus,
    /// Weapons to try first, in order
    #[serde(default)]
    pub ready_weapons: Vec<ItemId>,
    /// Armor to try first, in order
    #[serde(default)]
    pub ready_armor: Vec<ItemId>,
    /// Battle item chosen with PREPARE
    #[serde(default)]
    pub ready_item: Option<ItemId>,
    #[serde(default)]
    pub combat_spell: Option<SkillId>,
    /// Turns a monster has been free of its summoner
    #[serde(default)]
    pub free: u32,

    // Written by settlement
    #[serde(default)]
    pub losses: u32,
    #[serde(default = "yes")]
    pub can_attack: bool,
    #[serde(default)]
    pub no_move: bool,
    #[serde(default)]
    pub advancing: bool,
    #[serde(default)]
    pub practised: BTreeSet<SkillId>,
}

fn yes() -> bool {
    true
}

impl Unit {
    pub fn new(id: UnitId, name: &str, faction: &str, kind: UnitKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            faction: faction.to_string(),
            kind,
            items: ItemList::new(),
            skills: AHashMap::new(),
            behind: false,
            spoils: SpoilsPolicy::All,
            guard: GuardStatus::None,
            ready_weapons: Vec::new(),
            ready_armor: Vec::new(),
            ready_item: None,
            combat_spell: None,
            free: 0,
            losses: 0,
            can_attack: true,
            no_move: false,
            advancing: false,
            practised: BTreeSet::new(),
        }
    }

    pub fn skill(&self, skill: SkillId) -> i32 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }

    pub fn set_skill(&mut self, skill: SkillId, level: i32) {
        if level > 0 {
            self.skills.insert(skill, level);
        } else {
            self.skills.remove(&skill);
        }
    }

    /// Record that a skill was used this turn
    pub fn practise(&mut self, skill: SkillId) {
        self.practised.insert(skill);
    }

    pub fn is_mage(&self) -> bool {
        matches!(self.kind, UnitKind::Mage | UnitKind::GuardMage)
    }

    /// Mages and apprentices may use mage-only items
    pub fn knows_magic(&self) -> bool {
        self.is_mage() || self.kind == UnitKind::Apprentice
    }

    pub fn is_wandering_monster(&self) -> bool {
        self.kind == UnitKind::WanderingMonster
    }

    pub fn men(&self, race: ItemId) -> u32 {
        self.items.get(race)
    }

    pub fn set_men(&mut self, race: ItemId, num: u32) {
        self.items.set(race, num);
    }

    /// Men and monsters able to fight
    pub fn soldiers(&self, catalog: &Catalog) -> u32 {
        self.items
            .iter()
            .filter(|(item, _)| catalog.is_soldier(*item))
            .map(|(_, num)| num)
            .sum()
    }

    pub fn is_alive(&self, catalog: &Catalog) -> bool {
        self.soldiers(catalog) > 0
    }

    /// Best tactics available to the unit (monsters bring their own)
    pub fn tactics(&self, catalog: &Catalog) -> i32 {
        let monster_tactics = self
            .items
            .iter()
            .filter_map(|(item, _)| catalog.monster(item))
            .map(|monster| monster.tactics)
            .max()
            .unwrap_or(0);
        self.skill(catalog.core().tactics).max(monster_tactics)
    }

    /// Whether this unit's spoils policy lets it pick up `item`
    pub fn can_get_spoil(&self, item: &ItemDef) -> bool {
        if item.weight == 0 {
            return true;
        }
        match self.spoils {
            SpoilsPolicy::All => true,
            SpoilsPolicy::Weightless => false,
            SpoilsPolicy::Flying => item.fly >= item.weight,
            SpoilsPolicy::Walking => item.walk >= item.weight,
            SpoilsPolicy::Riding => item.ride >= item.weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;

    #[test]
    fn test_soldier_count_ignores_equipment() {
        let catalog = Catalog::standard();
        let mut unit = Unit::new(UnitId(1), "Raiders", "Norse", UnitKind::Normal);
        unit.items.set(ids::VIKING, 5);
        unit.items.set(ids::SWORD, 5);
        unit.items.set(ids::WOLF, 2);

        assert_eq!(unit.soldiers(&catalog), 7);
        assert!(unit.is_alive(&catalog));
    }

    #[test]
    fn test_spoils_policies() {
        let catalog = Catalog::standard();
        let mut unit = Unit::new(UnitId(1), "Raiders", "Norse", UnitKind::Normal);
        let horse = catalog.item(ids::HORSE);
        let iron = catalog.item(ids::IRON);
        let pearls = catalog.item(ids::PEARLS);

        assert!(unit.can_get_spoil(iron));

        unit.spoils = SpoilsPolicy::Weightless;
        assert!(!unit.can_get_spoil(iron));
        assert!(unit.can_get_spoil(pearls));

        unit.spoils = SpoilsPolicy::Riding;
        assert!(unit.can_get_spoil(horse));
        assert!(!unit.can_get_spoil(iron));

        unit.spoils = SpoilsPolicy::Flying;
        assert!(!unit.can_get_spoil(horse));
    }

    #[test]
    fn test_monster_tactics() {
        let catalog = Catalog::standard();
        let mut trolls = Unit::new(UnitId(7), "Trolls", "Monsters", UnitKind::WanderingMonster);
        trolls.items.set(ids::TROLL, 2);
        assert_eq!(trolls.tactics(&catalog), 1);

        trolls.set_skill(catalog.core().tactics, 3);
        assert_eq!(trolls.tactics(&catalog), 3);
    }
}
