//! Battle rule configuration with documented options
//!
//! A `RuleConfig` is read-only for the duration of a battle and is passed
//! explicitly to every algorithm that consults it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WarbandError};

/// When does an army rout?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoutPolicy {
    /// Rout once more than half of the starting figures are dead
    #[default]
    Figures,
    /// Rout once more than half of the starting hits are lost, every hit
    /// counted on its own (an army can rout with nobody dead)
    HitsIndividual,
    /// Rout once more than half of the starting hits are lost, but a
    /// figure's hits only count once the figure is dead
    HitsPerFigure,
}

/// Odds scale used when an attack level meets a defense level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatScale {
    /// Each level of difference doubles the odds
    #[default]
    PowerOfTwo,
    /// Odds are attack : defense
    Linear,
}

/// Treatment of the PREPARE order for battle items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrepareMode {
    /// Every battle item a unit carries is used
    None,
    /// Everything is used unless the unit prepared a specific item
    #[default]
    Normal,
    /// Only the prepared item (and shields) are used
    Strict,
}

/// Configuration for combat resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Which casualty measure decides a rout
    pub rout_policy: RoutPolicy,

    /// Odds scale for hit rolls and shield penetration
    pub combat_scale: CombatScale,

    /// Number of men one level of healing skill can treat
    ///
    /// A healer's capacity is `level * heals_per_man`, further capped by the
    /// herbs they carry.
    pub heals_per_man: u32,

    /// Do monsters regenerate hits between rounds?
    pub monster_battle_regen: bool,

    /// How battle items are selected at army construction
    pub prepare: PrepareMode,

    /// Percentage of a fallen winner's equipment recovered into the spoils
    ///
    /// The rest is discarded. At 100 nothing is lost.
    pub spoils_recovery_percent: u32,

    /// Turns after release during which a monster yields no spoils at all
    ///
    /// Zero disables the whole freedom rule.
    pub monster_no_spoils: u32,

    /// Turns over which a released monster's spoils recover to full value
    pub monster_spoils_recovery: u32,

    /// Cap on attacks per assassin in the free round (0 = no cap)
    pub max_assassin_free_attacks: u32,

    /// Rounds after which the battle ends indecisively
    pub max_rounds: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            rout_policy: RoutPolicy::Figures,
            combat_scale: CombatScale::PowerOfTwo,
            heals_per_man: 5,
            monster_battle_regen: true,
            prepare: PrepareMode::Normal,
            spoils_recovery_percent: 100,
            monster_no_spoils: 0,
            monster_spoils_recovery: 0,
            max_assassin_free_attacks: 0,
            max_rounds: 100,
        }
    }
}

impl RuleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Same defaults with a different rout policy
    pub fn with_rout_policy(rout_policy: RoutPolicy) -> Self {
        Self {
            rout_policy,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML rules file body
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RuleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load rules from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.spoils_recovery_percent > 100 {
            return Err(WarbandError::InvalidConfig(format!(
                "spoils_recovery_percent ({}) must be at most 100",
                self.spoils_recovery_percent
            )));
        }

        if self.monster_no_spoils > 0 && self.monster_spoils_recovery == 0 {
            return Err(WarbandError::InvalidConfig(
                "monster_no_spoils requires a non-zero monster_spoils_recovery".into(),
            ));
        }

        if self.max_rounds == 0 {
            return Err(WarbandError::InvalidConfig(
                "max_rounds must be positive".into(),
            ));
        }

        Ok(())
    }
}
