//! Armor definitions for probabilistic saves
//!
//! An armor saves against a hit with chance `saves[class] / from`, where the
//! class is that of the incoming weapon.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::WeaponClass;

/// Static properties of one armor type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorDef {
    /// Denominator of every save chance
    pub from: u32,
    /// Numerator per weapon class
    pub saves: [u32; WeaponClass::COUNT],
    /// Can be worn by the target of an assassination
    #[serde(default)]
    pub usable_in_assassination: bool,
}

impl ArmorDef {
    /// Save chance as (numerator, denominator), `None` if this armor has no
    /// entry for the class
    pub fn save_chance(&self, class: WeaponClass) -> Option<(u32, u32)> {
        let saves = self.saves[class.index()];
        if saves == 0 || self.from == 0 {
            return None;
        }
        Some((saves, self.from))
    }

    /// Roll one save against a hit of `class`
    pub fn roll_save<R: Rng + ?Sized>(&self, class: WeaponClass, rng: &mut R) -> bool {
        match self.save_chance(class) {
            Some((saves, from)) => saves > rng.gen_range(0..from),
            None => false,
        }
    }

    /// Light armor (leather): 1 in 4 against mundane weapons
    pub fn leather() -> Self {
        Self {
            from: 4,
            saves: [1, 1, 1, 1, 0, 0, 0, 0],
            usable_in_assassination: false,
        }
    }

    /// Medium armor (chain): 1 in 3 against mundane weapons
    pub fn chain() -> Self {
        Self {
            from: 3,
            saves: [1, 1, 1, 1, 0, 0, 0, 0],
            usable_in_assassination: false,
        }
    }

    /// Heavy armor (plate): 2 in 3, and some protection from crossbows
    pub fn plate() -> Self {
        Self {
            from: 3,
            saves: [2, 2, 2, 2, 1, 0, 0, 0],
            usable_in_assassination: false,
        }
    }

    /// Cloak of invulnerability: nearly everything, worn anywhere
    pub fn cloak() -> Self {
        Self {
            from: 10000,
            saves: [9999; WeaponClass::COUNT],
            usable_in_assassination: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_missing_entry_never_saves() {
        let leather = ArmorDef::leather();
        assert_eq!(leather.save_chance(WeaponClass::ArmorPiercing), None);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(!leather.roll_save(WeaponClass::MagicEnergy, &mut rng));
        }
    }

    #[test]
    fn test_armor_presets() {
        assert_eq!(ArmorDef::chain().save_chance(WeaponClass::Slashing), Some((1, 3)));
        assert_eq!(ArmorDef::plate().save_chance(WeaponClass::Slashing), Some((2, 3)));
        assert_eq!(ArmorDef::plate().save_chance(WeaponClass::ArmorPiercing), Some((1, 3)));
        assert!(ArmorDef::cloak().usable_in_assassination);
    }

    #[test]
    fn test_certain_save() {
        let wall = ArmorDef {
            from: 2,
            saves: [2; WeaponClass::COUNT],
            usable_in_assassination: false,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..100 {
            assert!(wall.roll_save(WeaponClass::Crushing, &mut rng));
        }
    }
}
