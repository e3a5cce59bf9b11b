//! Weapon definitions
//!
//! A weapon fixes the attack type, the weapon class armor saves against,
//! its length in melee, and how often it strikes.

use serde::{Deserialize, Serialize};

use crate::core::types::{AttackType, Round, SkillId, WeaponClass};

/// Capability and restriction flags of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponFlag {
    /// No bonus or use unless skilled
    NeedSkill,
    /// Ignores the 50% chance of not being ready
    AlwaysReady,
    /// No combat defense against this weapon
    NoDefense,
    /// Cannot be used on foot (lance)
    NoFoot,
    /// Cannot be used mounted (pike)
    NoMount,
    /// Short melee weapon (dagger, hatchet)
    Short,
    /// Long melee weapon (lance, pike)
    Long,
    /// Missile weapon, usable from the rear rank
    Ranged,
    /// Wielder gets no skill added to defense
    NoAttackerSkill,
    /// Riding bonus on attack and defense
    RidingBonus,
    /// Riding bonus on defense only
    RidingBonusDefense,
}

/// Relative weapon length in melee
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponLength {
    Short,
    Normal,
    Long,
}

impl WeaponLength {
    /// Length implied by a flag set (Long wins over Short)
    pub fn from_flags(flags: &[WeaponFlag]) -> Self {
        if flags.contains(&WeaponFlag::Long) {
            WeaponLength::Long
        } else if flags.contains(&WeaponFlag::Short) {
            WeaponLength::Short
        } else {
            WeaponLength::Normal
        }
    }
}

/// How often a weapon strikes, as written in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackRate {
    /// Fixed number of attacks per round
    PerRound(u32),
    /// One attack every N rounds (crossbows)
    EveryNthRound(u32),
    /// Half the wielder's skill (rounded up), plus a modifier
    HalfSkill(i32),
    /// The wielder's skill, plus a modifier
    Skill(i32),
}

impl Default for AttackRate {
    fn default() -> Self {
        AttackRate::PerRound(1)
    }
}

impl AttackRate {
    /// Resolve against the wielder's skill level
    pub fn resolve(self, skill: i32) -> Attacks {
        let per_round = match self {
            AttackRate::PerRound(n) => n as i32,
            AttackRate::EveryNthRound(n) => return Attacks::EveryNthRound(n.max(1)),
            AttackRate::HalfSkill(extra) => (skill + 1) / 2 + extra,
            AttackRate::Skill(extra) => skill + extra,
        };
        Attacks::PerRound(per_round.max(1) as u32)
    }
}

/// A combatant's resolved rate of attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attacks {
    PerRound(u32),
    EveryNthRound(u32),
}

impl Default for Attacks {
    fn default() -> Self {
        Attacks::PerRound(1)
    }
}

impl Attacks {
    /// Number of attacks available in `round` (rounds count from 1)
    pub fn in_round(self, round: Round) -> u32 {
        match self {
            Attacks::PerRound(n) => n,
            Attacks::EveryNthRound(n) if n <= 1 || round % n == 1 => 1,
            Attacks::EveryNthRound(_) => 0,
        }
    }
}

/// Static properties of one weapon type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDef {
    #[serde(default)]
    pub flags: Vec<WeaponFlag>,
    /// Skill required when the weapon has `NeedSkill`
    #[serde(default)]
    pub base_skill: Option<SkillId>,
    /// Alternative skill; the better of the two is used
    #[serde(default)]
    pub or_skill: Option<SkillId>,
    pub class: WeaponClass,
    pub attack_type: AttackType,
    #[serde(default)]
    pub rate: AttackRate,
    #[serde(default)]
    pub attack_bonus: i32,
    #[serde(default)]
    pub defense_bonus: i32,
    /// Added to the attack against mounted targets
    #[serde(default)]
    pub mount_bonus: i32,
}

impl WeaponDef {
    /// Check if weapon has a specific flag
    pub fn has_flag(&self, flag: WeaponFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn length(&self) -> WeaponLength {
        WeaponLength::from_flags(&self.flags)
    }

    /// Common weapon: Sword
    pub fn sword() -> Self {
        Self {
            flags: Vec::new(),
            base_skill: None,
            or_skill: None,
            class: WeaponClass::Slashing,
            attack_type: AttackType::Combat,
            rate: AttackRate::PerRound(1),
            attack_bonus: 2,
            defense_bonus: 2,
            mount_bonus: 0,
        }
    }

    /// Common weapon: Spear (good against riders)
    pub fn spear() -> Self {
        Self {
            flags: Vec::new(),
            base_skill: None,
            or_skill: None,
            class: WeaponClass::Piercing,
            attack_type: AttackType::Combat,
            rate: AttackRate::PerRound(1),
            attack_bonus: 1,
            defense_bonus: 1,
            mount_bonus: 2,
        }
    }

    /// Common weapon: Dagger
    pub fn dagger() -> Self {
        Self {
            flags: vec![WeaponFlag::Short],
            base_skill: None,
            or_skill: None,
            class: WeaponClass::Piercing,
            attack_type: AttackType::Combat,
            rate: AttackRate::PerRound(1),
            attack_bonus: 1,
            defense_bonus: 0,
            mount_bonus: 0,
        }
    }

    /// Common weapon: Pike (long, foot only)
    pub fn pike() -> Self {
        Self {
            flags: vec![WeaponFlag::Long, WeaponFlag::NoMount],
            base_skill: None,
            or_skill: None,
            class: WeaponClass::Piercing,
            attack_type: AttackType::Combat,
            rate: AttackRate::PerRound(1),
            attack_bonus: 1,
            defense_bonus: 2,
            mount_bonus: 3,
        }
    }

    /// Common weapon: Lance (long, mounted only, uses riding skill)
    pub fn lance() -> Self {
        Self {
            flags: vec![WeaponFlag::Long, WeaponFlag::NoFoot, WeaponFlag::RidingBonus],
            base_skill: None,
            or_skill: None,
            class: WeaponClass::Piercing,
            attack_type: AttackType::Riding,
            rate: AttackRate::PerRound(1),
            attack_bonus: 3,
            defense_bonus: 0,
            mount_bonus: 0,
        }
    }

    /// Missile weapon: Longbow
    pub fn longbow(skill: SkillId) -> Self {
        Self {
            flags: vec![
                WeaponFlag::Ranged,
                WeaponFlag::NeedSkill,
                WeaponFlag::NoAttackerSkill,
            ],
            base_skill: Some(skill),
            or_skill: None,
            class: WeaponClass::Piercing,
            attack_type: AttackType::Ranged,
            rate: AttackRate::PerRound(1),
            attack_bonus: -1,
            defense_bonus: 0,
            mount_bonus: 0,
        }
    }

    /// Missile weapon: Crossbow (always ready, slow, pierces armor)
    pub fn crossbow(skill: SkillId) -> Self {
        Self {
            flags: vec![
                WeaponFlag::Ranged,
                WeaponFlag::NeedSkill,
                WeaponFlag::AlwaysReady,
                WeaponFlag::NoAttackerSkill,
            ],
            base_skill: Some(skill),
            or_skill: None,
            class: WeaponClass::ArmorPiercing,
            attack_type: AttackType::Ranged,
            rate: AttackRate::EveryNthRound(2),
            attack_bonus: 0,
            defense_bonus: 0,
            mount_bonus: 0,
        }
    }
}
