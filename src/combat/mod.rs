//! The army combat-resolution engine
//!
//! Everything here is synchronous and infallible. Randomness comes in
//! through `&mut impl Rng`; static data and rules through `BattleContext`.

pub mod army;
pub mod combatant;
pub mod effects;
pub mod healing;
pub mod hits;
pub mod muster;
pub mod settlement;
pub mod setup;
pub mod shields;
pub mod spoils;

pub use army::{AttackOutcome, AttackSpec, Attacker, Army, RankCounts, RoundSummary};
pub use combatant::{Combatant, Rank, Survival, WeaponAttack};
pub use effects::EffectSet;
pub use settlement::Settlement;
pub use shields::{Shield, ShieldRegistry};
pub use spoils::SpoilsDistribution;

use crate::catalog::Catalog;
use crate::core::config::RuleConfig;

/// Read-only inputs every combat algorithm consults
#[derive(Debug, Clone, Copy)]
pub struct BattleContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a RuleConfig,
}

impl<'a> BattleContext<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a RuleConfig) -> Self {
        Self { catalog, config }
    }
}
