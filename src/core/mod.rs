pub mod config;
pub mod error;
pub mod types;

pub use config::{CombatScale, PrepareMode, RoutPolicy, RuleConfig};
pub use error::{Result, WarbandError};
