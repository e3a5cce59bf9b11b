//! Skill definitions and healing rules

use serde::{Deserialize, Serialize};

use crate::core::types::{ItemId, SpecialId};

/// One entry of the skill catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub name: String,
    pub abbr: String,
    /// Combat spells name the special they cast
    #[serde(default)]
    pub combat_special: Option<SpecialId>,
    #[serde(default)]
    pub magic: bool,
}

impl SkillDef {
    pub fn new(name: &str, abbr: &str) -> Self {
        Self {
            name: name.to_string(),
            abbr: abbr.to_string(),
            combat_special: None,
            magic: false,
        }
    }

    pub fn spell(name: &str, abbr: &str, special: SpecialId) -> Self {
        Self {
            name: name.to_string(),
            abbr: abbr.to_string(),
            combat_special: Some(special),
            magic: true,
        }
    }

    pub fn is_combat_spell(&self) -> bool {
        self.combat_special.is_some()
    }
}

/// Success rates and consumables for battlefield healing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealingRules {
    /// Percent success per heal type; index 0 is heal type 1
    pub rates: Vec<u32>,
    /// Consumed one per patient by skilled healers
    #[serde(default)]
    pub herbs: Option<ItemId>,
    /// One potion treats `potion_capacity` patients
    #[serde(default)]
    pub potion: Option<ItemId>,
    #[serde(default = "default_potion_capacity")]
    pub potion_capacity: u32,
}

fn default_potion_capacity() -> u32 {
    10
}

impl Default for HealingRules {
    fn default() -> Self {
        Self {
            rates: vec![50, 60, 70, 80, 90],
            herbs: None,
            potion: None,
            potion_capacity: 10,
        }
    }
}

impl HealingRules {
    /// Highest heal type available
    pub fn max_type(&self) -> u32 {
        self.rates.len() as u32
    }

    /// Success percentage for a heal type, 0 when the type is unknown
    pub fn rate(&self, heal_type: u32) -> u32 {
        if heal_type == 0 {
            return 0;
        }
        self.rates.get(heal_type as usize - 1).copied().unwrap_or(0)
    }
}
