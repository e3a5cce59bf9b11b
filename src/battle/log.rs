//! Structured record of what happened in a battle
//!
//! The log carries facts, not prose; `description` is a short
//! human-readable line a report writer can use as-is or ignore.

use serde::{Deserialize, Serialize};

use crate::combat::RoundSummary;
use crate::core::types::Round;

/// Which side of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted { attackers: usize, defenders: usize },
    FreeRound { side: Side },
    RoundStarted,
    ShieldRaised { side: Side, caster: String, special: String },
    SpecialAttack { side: Side, caster: String, special: String, landed: u32 },
    /// An attack stopped by the opposing army's shield
    ShieldBlocked { side: Side, caster: String, special: String },
    Casualties { side: Side, summary: RoundSummary },
    Routed { side: Side },
    Destroyed { side: Side },
    BattleEnded { outcome: super::BattleOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub round: Round,
    pub event_type: BattleEventType,
    pub description: String,
}

/// Events in the order they happened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLog {
    pub events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, round: Round) {
        self.events.push(BattleEvent {
            round,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Casualty reports for one side, free rounds included
    pub fn casualties(&self, side: Side) -> impl Iterator<Item = &RoundSummary> + '_ {
        self.events.iter().filter_map(move |event| match &event.event_type {
            BattleEventType::Casualties { side: s, summary } if *s == side => Some(summary),
            _ => None,
        })
    }

    /// Plain-text rendering, one event per line
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().map(|event| event.description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casualties_filtered_by_side() {
        let mut log = BattleLog::new();
        log.push(BattleEventType::RoundStarted, "Round 1:".into(), 1);
        log.push(
            BattleEventType::Casualties {
                side: Side::Attacker,
                summary: RoundSummary {
                    round: 1,
                    alive: 4,
                    ..RoundSummary::default()
                },
            },
            "Attackers: 4 left".into(),
            1,
        );
        log.push(
            BattleEventType::Casualties {
                side: Side::Defender,
                summary: RoundSummary::default(),
            },
            "Defenders: 0 left".into(),
            1,
        );

        let attacker: Vec<_> = log.casualties(Side::Attacker).collect();
        assert_eq!(attacker.len(), 1);
        assert_eq!(attacker[0].alive, 4);
        assert_eq!(log.lines().next(), Some("Round 1:"));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Attacker.opponent(), Side::Defender);
        assert_eq!(Side::Defender.opponent(), Side::Attacker);
    }
}
