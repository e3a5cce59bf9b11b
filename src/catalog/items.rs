//! Item definitions: races, monsters, mounts and battle items
//!
//! Every soldier race is an item (men and monsters are carried in a unit's
//! inventory like anything else), so an `ItemDef` optionally carries one
//! definition block per role it can play.

use serde::{Deserialize, Serialize};

use crate::catalog::armor::ArmorDef;
use crate::catalog::weapons::WeaponDef;
use crate::core::types::{DefenseSkills, SkillId, SpecialId};

/// Broad classification used for spoils generation and targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Normal,
    Advanced,
    Trade,
    Magic,
    /// Never generated as monster spoils
    Special,
    Tool,
    Food,
    /// Summoned images that vanish when hit
    Illusion,
}

/// A race of men
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManDef {
    #[serde(default = "default_hits")]
    pub hits: i32,
}

fn default_hits() -> i32 {
    1
}

impl Default for ManDef {
    fn default() -> Self {
        Self { hits: 1 }
    }
}

/// A monster race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterDef {
    pub attack_level: i32,
    #[serde(default)]
    pub defense: DefenseSkills,
    #[serde(default = "default_hits")]
    pub attacks: i32,
    #[serde(default = "default_hits")]
    pub hits: i32,
    #[serde(default)]
    pub regen: i32,
    #[serde(default)]
    pub tactics: i32,
    #[serde(default)]
    pub special: Option<SpecialId>,
    #[serde(default)]
    pub special_level: i32,
    /// Silver carried, the base value of generated spoils
    #[serde(default)]
    pub silver: u32,
    /// Kind of item dropped besides silver
    #[serde(default)]
    pub spoils: Option<ItemKind>,
}

/// A mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountDef {
    /// Skill whose level is the riding bonus
    pub skill: SkillId,
    /// Minimum skill level (and bonus) to use the mount at all
    pub min_bonus: i32,
    pub max_bonus: i32,
    /// Cap when a flying mount is ridden where flying is not allowed
    #[serde(default)]
    pub max_hampered_bonus: i32,
    #[serde(default)]
    pub special: Option<SpecialId>,
    #[serde(default)]
    pub special_level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleItemFlag {
    /// Only mages and apprentices can use it
    MageOnly,
    /// Grants the bearer its special ability
    Special,
    /// Raises the bearer's defenses to the item level
    Shield,
    /// Bearer cannot be damaged
    Invulnerability,
}

/// An item that does something in battle (amulets, staves, shieldstones)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleItemDef {
    #[serde(default)]
    pub flags: Vec<BattleItemFlag>,
    #[serde(default)]
    pub special: Option<SpecialId>,
    #[serde(default)]
    pub level: i32,
}

impl BattleItemDef {
    pub fn has_flag(&self, flag: BattleItemFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// One entry of the item catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    pub abbr: String,
    #[serde(default)]
    pub kinds: Vec<ItemKind>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_price: u32,
    /// Carrying capacities, used by the spoils policies
    #[serde(default)]
    pub walk: u32,
    #[serde(default)]
    pub ride: u32,
    #[serde(default)]
    pub fly: u32,

    pub man: Option<ManDef>,
    pub monster: Option<MonsterDef>,
    pub weapon: Option<WeaponDef>,
    pub armor: Option<ArmorDef>,
    pub mount: Option<MountDef>,
    pub battle: Option<BattleItemDef>,
}

impl ItemDef {
    /// Plain item with no combat role
    pub fn new(name: &str, abbr: &str) -> Self {
        Self {
            name: name.to_string(),
            abbr: abbr.to_string(),
            kinds: Vec::new(),
            disabled: false,
            weight: 0,
            base_price: 0,
            walk: 0,
            ride: 0,
            fly: 0,
            man: None,
            monster: None,
            weapon: None,
            armor: None,
            mount: None,
            battle: None,
        }
    }

    pub fn is(&self, kind: ItemKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Men and monsters are soldiers; everything else is equipment
    pub fn is_soldier(&self) -> bool {
        self.man.is_some() || self.monster.is_some()
    }

    pub fn with_kinds(mut self, kinds: &[ItemKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn with_weight(mut self, weight: u32, base_price: u32) -> Self {
        self.weight = weight;
        self.base_price = base_price;
        self
    }

    pub fn with_capacity(mut self, walk: u32, ride: u32, fly: u32) -> Self {
        self.walk = walk;
        self.ride = ride;
        self.fly = fly;
        self
    }
}
