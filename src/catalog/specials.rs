//! Special abilities and the effects they leave behind
//!
//! A special is what a combat spell, a monster, a mount or a battle item
//! does in addition to plain weapon attacks: several damage entries, an
//! optional target filter, and possibly an army-wide shield.

use serde::{Deserialize, Serialize};

use crate::catalog::weapons::WeaponFlag;
use crate::core::types::{AttackType, EffectId, ItemId, StructureKind, WeaponClass};

/// Restricts which soldiers a special may target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFilter {
    /// Only soldiers inside one of the listed structures
    BuildingIf,
    /// Never soldiers inside one of the listed structures
    BuildingExcept,
    /// Only soldiers of the listed races
    SoldierIf,
    /// Never soldiers of the listed races
    SoldierExcept,
    /// Only soldiers riding one of the listed mounts
    MountIf,
    /// Never soldiers riding one of the listed mounts
    MountExcept,
    /// Only soldiers bearing one of the listed effects
    EffectIf,
    /// Never soldiers bearing one of the listed effects
    EffectExcept,
    /// Only illusions
    Illusion,
    /// Never monsters
    NoMonster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialFlag {
    /// Defenders inside structures lose 2 from their defense
    NoBuilding,
    /// Casts an army-wide shield
    Shield,
    /// Damage counts are multiplied by the caster's level
    UseLevel,
}

/// One damage entry of a special
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDamage {
    /// Defense category; `None` cannot be defended against
    #[serde(default)]
    pub attack_type: Option<AttackType>,
    /// Guaranteed number of strikes
    #[serde(default)]
    pub min: u32,
    /// Two random draws below this are added to `min`
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub flags: Vec<WeaponFlag>,
    #[serde(default = "default_class")]
    pub class: WeaponClass,
    /// Applied instead of damage when set
    #[serde(default)]
    pub effect: Option<EffectId>,
    /// Removes this effect from the caster's own army instead of attacking
    #[serde(default)]
    pub cleanse: Option<EffectId>,
}

fn default_class() -> WeaponClass {
    WeaponClass::Slashing
}

impl SpecialDamage {
    pub fn new(attack_type: Option<AttackType>, min: u32, value: u32, class: WeaponClass) -> Self {
        Self {
            attack_type,
            min,
            value,
            flags: Vec::new(),
            class,
            effect: None,
            cleanse: None,
        }
    }

    pub fn with_effect(mut self, effect: EffectId) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Entry that clears `effect` from the caster's side
    pub fn cleansing(effect: EffectId, min: u32, value: u32) -> Self {
        Self {
            cleanse: Some(effect),
            ..Self::new(None, min, value, WeaponClass::Slashing)
        }
    }

    /// Number of strikes: `min` plus two draws below `value`
    pub fn roll_times<R: rand::Rng + ?Sized>(&self, level: i32, use_level: bool, rng: &mut R) -> u32 {
        let times = if use_level {
            self.value.saturating_mul(level.max(0) as u32)
        } else {
            self.value
        };
        if times == 0 {
            return self.min;
        }
        self.min + rng.gen_range(0..times) + rng.gen_range(0..times)
    }

    pub fn has_flag(&self, flag: WeaponFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// A special ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDef {
    pub name: String,
    #[serde(default)]
    pub flags: Vec<SpecialFlag>,
    #[serde(default)]
    pub targets: Vec<TargetFilter>,
    /// Structures consulted by the building filters
    #[serde(default)]
    pub buildings: Vec<StructureKind>,
    /// Races consulted by the soldier filters
    #[serde(default)]
    pub races: Vec<ItemId>,
    /// Mounts consulted by the mount filters
    #[serde(default)]
    pub mounts: Vec<ItemId>,
    /// Effects consulted by the effect filters
    #[serde(default)]
    pub effects: Vec<EffectId>,
    /// Attack types covered when this is a shield
    #[serde(default)]
    pub shields: Vec<AttackType>,
    #[serde(default)]
    pub damage: Vec<SpecialDamage>,
    /// Report phrase, e.g. "shoots a Fireball"
    #[serde(default)]
    pub description: String,
}

impl SpecialDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: Vec::new(),
            targets: Vec::new(),
            buildings: Vec::new(),
            races: Vec::new(),
            mounts: Vec::new(),
            effects: Vec::new(),
            shields: Vec::new(),
            damage: Vec::new(),
            description: String::new(),
        }
    }

    pub fn has_flag(&self, flag: SpecialFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn has_target(&self, filter: TargetFilter) -> bool {
        self.targets.contains(&filter)
    }

    /// A special with no target filters may hit anyone
    pub fn is_targeted(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Attack types a shield covers; an empty list covers all of them
    pub fn shield_types(&self) -> Vec<AttackType> {
        if self.shields.is_empty() {
            AttackType::ALL.to_vec()
        } else {
            self.shields.clone()
        }
    }
}

/// Modifier to one defense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseMod {
    pub attack_type: AttackType,
    pub value: i32,
}

/// Upper bound on defense modifiers per effect
pub const MAX_DEFENSE_MODS: usize = 4;

/// A named status modifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDef {
    pub name: String,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense_mods: Vec<DefenseMod>,
    /// Cleared after the bearer's next attack and at round end
    #[serde(default)]
    pub one_shot: bool,
    /// Modifiers apply but the bit is never recorded
    #[serde(default)]
    pub no_set: bool,
    /// Effect cleared when this one is set
    #[serde(default)]
    pub cancels: Option<EffectId>,
}

impl EffectDef {
    pub fn new(name: &str, attack: i32) -> Self {
        Self {
            name: name.to_string(),
            attack,
            defense_mods: Vec::new(),
            one_shot: false,
            no_set: false,
            cancels: None,
        }
    }
}
