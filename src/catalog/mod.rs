//! Static, read-only lookup tables
//!
//! Items, skills, specials and effects are indexed by small integer ids.
//! The combat engine never mutates a catalog; one catalog is shared by
//! reference across every battle (and every thread) that uses it.

pub mod armor;
pub mod items;
pub mod skills;
pub mod specials;
mod standard;
pub mod weapons;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use armor::ArmorDef;
pub use items::{BattleItemDef, BattleItemFlag, ItemDef, ItemKind, ManDef, MonsterDef, MountDef};
pub use skills::{HealingRules, SkillDef};
pub use specials::{DefenseMod, EffectDef, SpecialDamage, SpecialDef, SpecialFlag, TargetFilter};
pub use standard::ids;
pub use weapons::{AttackRate, Attacks, WeaponDef, WeaponFlag, WeaponLength};

use crate::core::error::{Result, WarbandError};
use crate::core::types::{EffectId, ItemId, SkillId, SpecialId};
use crate::combat::effects::MAX_EFFECTS;

/// Skills the combat rules consult by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSkills {
    pub combat: SkillId,
    pub riding: SkillId,
    pub tactics: SkillId,
    pub healing: SkillId,
    pub magical_healing: SkillId,
}

impl Default for CoreSkills {
    fn default() -> Self {
        Self {
            combat: SkillId(0),
            riding: SkillId(0),
            tactics: SkillId(0),
            healing: SkillId(0),
            magical_healing: SkillId(0),
        }
    }
}

/// All static game data the combat engine reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub skills: Vec<SkillDef>,
    #[serde(default)]
    pub specials: Vec<SpecialDef>,
    #[serde(default)]
    pub effects: Vec<EffectDef>,
    #[serde(default)]
    pub healing: HealingRules,
    #[serde(skip)]
    core: CoreSkills,
    #[serde(skip)]
    silver: Option<ItemId>,
}

impl Catalog {
    /// Parse a TOML catalog, resolve the core skills and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.finish()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve role lookups by abbreviation, then validate
    pub fn finish(mut self) -> Result<Self> {
        self.core = CoreSkills {
            combat: self.lookup_skill("COMB")?,
            riding: self.lookup_skill("RIDI")?,
            tactics: self.lookup_skill("TACT")?,
            healing: self.lookup_skill("HEAL")?,
            magical_healing: self.lookup_skill("MHEA")?,
        };
        self.silver = self.item_id("SILV");
        self.validate()?;
        Ok(self)
    }

    pub fn core(&self) -> &CoreSkills {
        &self.core
    }

    pub fn silver(&self) -> Option<ItemId> {
        self.silver
    }

    pub fn item(&self, id: ItemId) -> &ItemDef {
        &self.items[id.0 as usize]
    }

    pub fn get_item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.0 as usize)
    }

    pub fn skill(&self, id: SkillId) -> &SkillDef {
        &self.skills[id.0 as usize]
    }

    pub fn special(&self, id: SpecialId) -> &SpecialDef {
        &self.specials[id.0 as usize]
    }

    pub fn effect(&self, id: EffectId) -> &EffectDef {
        &self.effects[id.0 as usize]
    }

    pub fn num_effects(&self) -> usize {
        self.effects.len()
    }

    /// Every item id, in catalog order
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.items.len()).map(|i| ItemId(i as u16))
    }

    pub fn weapon(&self, id: ItemId) -> Option<&WeaponDef> {
        self.get_item(id).and_then(|item| item.weapon.as_ref())
    }

    pub fn armor(&self, id: ItemId) -> Option<&ArmorDef> {
        self.get_item(id).and_then(|item| item.armor.as_ref())
    }

    pub fn mount(&self, id: ItemId) -> Option<&MountDef> {
        self.get_item(id).and_then(|item| item.mount.as_ref())
    }

    pub fn monster(&self, id: ItemId) -> Option<&MonsterDef> {
        self.get_item(id).and_then(|item| item.monster.as_ref())
    }

    pub fn man(&self, id: ItemId) -> Option<&ManDef> {
        self.get_item(id).and_then(|item| item.man.as_ref())
    }

    pub fn battle_item(&self, id: ItemId) -> Option<&BattleItemDef> {
        self.get_item(id).and_then(|item| item.battle.as_ref())
    }

    pub fn is_soldier(&self, id: ItemId) -> bool {
        self.get_item(id).map_or(false, ItemDef::is_soldier)
    }

    pub fn is_monster(&self, id: ItemId) -> bool {
        self.monster(id).is_some()
    }

    /// Base hits of one figure of a race (at least 1)
    pub fn race_hits(&self, race: ItemId) -> i32 {
        let hits = match (self.man(race), self.monster(race)) {
            (_, Some(monster)) => monster.hits,
            (Some(man), None) => man.hits,
            (None, None) => 1,
        };
        hits.max(1)
    }

    pub fn item_id(&self, abbr: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|item| item.abbr.eq_ignore_ascii_case(abbr))
            .map(|i| ItemId(i as u16))
    }

    pub fn skill_id(&self, abbr: &str) -> Option<SkillId> {
        self.skills
            .iter()
            .position(|skill| skill.abbr.eq_ignore_ascii_case(abbr))
            .map(|i| SkillId(i as u16))
    }

    pub fn lookup_item(&self, abbr: &str) -> Result<ItemId> {
        self.item_id(abbr)
            .ok_or_else(|| WarbandError::UnknownItem(abbr.to_string()))
    }

    pub fn lookup_skill(&self, abbr: &str) -> Result<SkillId> {
        self.skill_id(abbr)
            .ok_or_else(|| WarbandError::UnknownSkill(abbr.to_string()))
    }

    /// Check every cross-reference and bound
    pub fn validate(&self) -> Result<()> {
        if self.items.len() > u16::MAX as usize || self.skills.len() > u16::MAX as usize {
            return Err(invalid("too many items or skills".into()));
        }

        if self.effects.len() > MAX_EFFECTS {
            return Err(invalid(format!(
                "{} effects defined, at most {} are supported",
                self.effects.len(),
                MAX_EFFECTS
            )));
        }

        for (i, item) in self.items.iter().enumerate() {
            if self.items[..i]
                .iter()
                .any(|other| other.abbr.eq_ignore_ascii_case(&item.abbr))
            {
                return Err(invalid(format!("duplicate item abbreviation {}", item.abbr)));
            }
            self.validate_item(item)?;
        }

        for skill in &self.skills {
            if let Some(special) = skill.combat_special {
                self.check_special(special, &skill.name)?;
            }
        }

        for special in &self.specials {
            let damage_effects = special
                .damage
                .iter()
                .flat_map(|damage| damage.effect.into_iter().chain(damage.cleanse));
            for effect in special.effects.iter().copied().chain(damage_effects) {
                self.check_effect(effect, &special.name)?;
            }
            for race in special.races.iter().chain(special.mounts.iter()) {
                self.check_item(*race, &special.name)?;
            }
        }

        for effect in &self.effects {
            if effect.defense_mods.len() > specials::MAX_DEFENSE_MODS {
                return Err(invalid(format!(
                    "effect {} has more than {} defense modifiers",
                    effect.name,
                    specials::MAX_DEFENSE_MODS
                )));
            }
            if let Some(cancels) = effect.cancels {
                self.check_effect(cancels, &effect.name)?;
            }
        }

        if self.healing.rates.iter().any(|rate| *rate > 100) {
            return Err(invalid("heal rates are percentages".into()));
        }
        for item in self.healing.herbs.iter().chain(self.healing.potion.iter()) {
            self.check_item(*item, "healing rules")?;
        }

        Ok(())
    }

    fn validate_item(&self, item: &ItemDef) -> Result<()> {
        if let Some(weapon) = &item.weapon {
            for skill in weapon.base_skill.iter().chain(weapon.or_skill.iter()) {
                self.check_skill(*skill, &item.name)?;
            }
            if weapon.has_flag(WeaponFlag::NeedSkill)
                && weapon.base_skill.is_none()
                && weapon.or_skill.is_none()
            {
                return Err(invalid(format!("weapon {} needs a skill but names none", item.name)));
            }
        }
        if let Some(armor) = &item.armor {
            if armor.from == 0 {
                return Err(invalid(format!("armor {} has a zero save denominator", item.name)));
            }
        }
        if let Some(mount) = &item.mount {
            self.check_skill(mount.skill, &item.name)?;
            if let Some(special) = mount.special {
                self.check_special(special, &item.name)?;
            }
        }
        if let Some(monster) = &item.monster {
            if let Some(special) = monster.special {
                self.check_special(special, &item.name)?;
            }
        }
        if let Some(battle) = &item.battle {
            if let Some(special) = battle.special {
                self.check_special(special, &item.name)?;
            }
            if (battle.has_flag(BattleItemFlag::Special) || battle.has_flag(BattleItemFlag::Shield))
                && battle.special.is_none()
            {
                return Err(invalid(format!(
                    "battle item {} is flagged special or shield but names no special",
                    item.name
                )));
            }
        }
        Ok(())
    }

    fn check_item(&self, id: ItemId, owner: &str) -> Result<()> {
        if self.get_item(id).is_none() {
            return Err(invalid(format!("{} refers to unknown item {}", owner, id.0)));
        }
        Ok(())
    }

    fn check_skill(&self, id: SkillId, owner: &str) -> Result<()> {
        if id.0 as usize >= self.skills.len() {
            return Err(invalid(format!("{} refers to unknown skill {}", owner, id.0)));
        }
        Ok(())
    }

    fn check_special(&self, id: SpecialId, owner: &str) -> Result<()> {
        if id.0 as usize >= self.specials.len() {
            return Err(invalid(format!("{} refers to unknown special {}", owner, id.0)));
        }
        Ok(())
    }

    fn check_effect(&self, id: EffectId, owner: &str) -> Result<()> {
        if id.0 as usize >= self.effects.len() {
            return Err(invalid(format!("{} refers to unknown effect {}", owner, id.0)));
        }
        Ok(())
    }
}

fn invalid(message: String) -> WarbandError {
    WarbandError::InvalidCatalog(message)
}
