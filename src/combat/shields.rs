//! Army-wide magical shields
//!
//! Shields are rebuilt from the living casters at the start of every round.
//! An incoming shieldable attack must first beat the strongest shield of its
//! type; a killing spell that gets through destroys that shield.

use serde::{Deserialize, Serialize};

use crate::core::types::AttackType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    pub attack_type: AttackType,
    pub level: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldRegistry {
    shields: Vec<Shield>,
}

impl ShieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shields.clear();
    }

    pub fn add(&mut self, attack_type: AttackType, level: i32) {
        self.shields.push(Shield { attack_type, level });
    }

    /// Index of the strongest shield against `attack_type`; the earliest
    /// raised wins ties
    pub fn high_shield(&self, attack_type: AttackType) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, shield) in self.shields.iter().enumerate() {
            if shield.attack_type != attack_type {
                continue;
            }
            match best {
                Some(b) if self.shields[b].level >= shield.level => {}
                _ => best = Some(i),
            }
        }
        best
    }

    pub fn get(&self, index: usize) -> Option<&Shield> {
        self.shields.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Shield> {
        if index < self.shields.len() {
            Some(self.shields.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.shields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shield> {
        self.shields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_shield_by_type() {
        let mut shields = ShieldRegistry::new();
        shields.add(AttackType::Energy, 2);
        shields.add(AttackType::Spirit, 5);
        shields.add(AttackType::Energy, 4);
        shields.add(AttackType::Energy, 4);

        assert_eq!(shields.high_shield(AttackType::Energy), Some(2));
        assert_eq!(shields.high_shield(AttackType::Spirit), Some(1));
        assert_eq!(shields.high_shield(AttackType::Weather), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut shields = ShieldRegistry::new();
        shields.add(AttackType::Ranged, 1);
        assert_eq!(shields.remove(0).map(|s| s.level), Some(1));
        assert_eq!(shields.remove(0), None);

        shields.add(AttackType::Ranged, 1);
        shields.clear();
        assert!(shields.is_empty());
    }
}
