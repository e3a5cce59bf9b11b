//! Set of active effects on a combatant
//!
//! Effects are catalog entries with ids below `MAX_EFFECTS`, so a set is a
//! single 64-bit word.

use serde::{Deserialize, Serialize};

use crate::core::types::EffectId;

/// Largest number of effects a catalog may define
pub const MAX_EFFECTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct EffectSet(u64);

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn bit(effect: EffectId) -> u64 {
        debug_assert!((effect.0 as usize) < MAX_EFFECTS);
        1u64 << (effect.0 as u32 % MAX_EFFECTS as u32)
    }

    pub fn contains(&self, effect: EffectId) -> bool {
        self.0 & Self::bit(effect) != 0
    }

    /// Returns true if the effect was not already present
    pub fn insert(&mut self, effect: EffectId) -> bool {
        let had = self.contains(effect);
        self.0 |= Self::bit(effect);
        !had
    }

    /// Returns true if the effect was present
    pub fn remove(&mut self, effect: EffectId) -> bool {
        let had = self.contains(effect);
        self.0 &= !Self::bit(effect);
        had
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Active effects in id order
    pub fn iter(&self) -> impl Iterator<Item = EffectId> + '_ {
        (0..MAX_EFFECTS as u8)
            .map(EffectId)
            .filter(move |effect| self.contains(*effect))
    }
}
