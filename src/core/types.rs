//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Index into the item catalog (men, monsters, weapons, armor, silver...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

/// Index into the skill catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u16);

/// Index into the special-ability catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpecialId(pub u16);

/// Index into the effect catalog (at most 64 effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u8);

/// Kind of structure a combatant fights from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureKind(pub u16);

/// Unique identifier for units in a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Battle round counter
pub type Round = u32;

/// Damage source, also the defense category it is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    /// Normal melee fighting
    Combat,
    /// Raw magical energy
    Energy,
    /// Spiritual assault
    Spirit,
    /// Manipulation of the weather
    Weather,
    /// Height, leverage and momentum of a mount
    Riding,
    /// Projectiles at a distance
    Ranged,
}

impl AttackType {
    pub const COUNT: usize = 6;

    pub const ALL: [AttackType; Self::COUNT] = [
        AttackType::Combat,
        AttackType::Energy,
        AttackType::Spirit,
        AttackType::Weather,
        AttackType::Riding,
        AttackType::Ranged,
    ];

    pub fn index(self) -> usize {
        match self {
            AttackType::Combat => 0,
            AttackType::Energy => 1,
            AttackType::Spirit => 2,
            AttackType::Weather => 3,
            AttackType::Riding => 4,
            AttackType::Ranged => 5,
        }
    }

    /// Can an army shield stand against this attack?
    pub fn shieldable(self) -> bool {
        !matches!(self, AttackType::Combat | AttackType::Riding)
    }

    /// Is this a physical (weapon) attack rather than magic?
    pub fn is_physical(self) -> bool {
        matches!(
            self,
            AttackType::Combat | AttackType::Riding | AttackType::Ranged
        )
    }
}

/// Weapon class, selects the armor save that applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Sharpened edge (the default)
    Slashing,
    /// Spear or arrow
    Piercing,
    /// Mace
    Crushing,
    /// Axe
    Cleaving,
    /// Crossbow, double bow
    ArmorPiercing,
    /// Fire, dragon breath
    MagicEnergy,
    /// Black wind
    MagicSpirit,
    /// Tornado
    MagicWeather,
}

impl WeaponClass {
    pub const COUNT: usize = 8;

    pub fn index(self) -> usize {
        match self {
            WeaponClass::Slashing => 0,
            WeaponClass::Piercing => 1,
            WeaponClass::Crushing => 2,
            WeaponClass::Cleaving => 3,
            WeaponClass::ArmorPiercing => 4,
            WeaponClass::MagicEnergy => 5,
            WeaponClass::MagicSpirit => 6,
            WeaponClass::MagicWeather => 7,
        }
    }
}

/// Bucket used to tally hits and kills by source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackBin {
    Melee,
    Cavalry,
    Ranged,
    Energy,
    Weather,
    Spirit,
}

impl AttackBin {
    pub const COUNT: usize = 6;

    pub const ALL: [AttackBin; Self::COUNT] = [
        AttackBin::Melee,
        AttackBin::Cavalry,
        AttackBin::Ranged,
        AttackBin::Energy,
        AttackBin::Weather,
        AttackBin::Spirit,
    ];

    /// Classify an attack; mounted melee counts as cavalry
    pub fn classify(attack: AttackType, mounted: bool) -> Self {
        match attack {
            AttackType::Combat if mounted => AttackBin::Cavalry,
            AttackType::Combat => AttackBin::Melee,
            AttackType::Riding => AttackBin::Cavalry,
            AttackType::Ranged => AttackBin::Ranged,
            AttackType::Energy => AttackBin::Energy,
            AttackType::Weather => AttackBin::Weather,
            AttackType::Spirit => AttackBin::Spirit,
        }
    }

    pub fn index(self) -> usize {
        match self {
            AttackBin::Melee => 0,
            AttackBin::Cavalry => 1,
            AttackBin::Ranged => 2,
            AttackBin::Energy => 3,
            AttackBin::Weather => 4,
            AttackBin::Spirit => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttackBin::Melee => "melee",
            AttackBin::Cavalry => "cavalry",
            AttackBin::Ranged => "ranged",
            AttackBin::Energy => "energy",
            AttackBin::Weather => "weather",
            AttackBin::Spirit => "spirit",
        }
    }
}

/// Per-category tally (hits taken, kills suffered)
pub type BinTally = [u32; AttackBin::COUNT];

/// Defense skill per attack type
pub type DefenseSkills = [i32; AttackType::COUNT];

/// What terrain allows in the way of mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Terrain {
    pub riding_mounts: bool,
    pub flying_mounts: bool,
}

impl Terrain {
    /// Open ground: horses and fliers both usable
    pub fn open() -> Self {
        Self {
            riding_mounts: true,
            flying_mounts: true,
        }
    }

    /// Forest, swamp, mountains: no riding, flying still fine
    pub fn rough() -> Self {
        Self {
            riding_mounts: false,
            flying_mounts: true,
        }
    }

    /// Underground or underwater: no mounts at all
    pub fn enclosed() -> Self {
        Self::default()
    }

    pub fn allows_mounts(&self) -> bool {
        self.riding_mounts || self.flying_mounts
    }
}
