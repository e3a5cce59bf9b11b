//! Battle orchestration - drives armies through rounds to a result
//!
//! The combat engine in `crate::combat` knows how one army attacks,
//! heals and settles. This module decides who attacks when:
//! - free rounds for superior tactics or an assassin
//! - normal rounds with randomly interleaved attackers
//! - a pursuit round against a routed enemy
//! - settlement and sharing out the spoils

pub mod execution;
pub mod log;

pub use execution::{collect_unit_spoils, Assassination, Battle, BattleOutcome, BattleResult};
pub use log::{BattleEvent, BattleEventType, BattleLog, Side};
