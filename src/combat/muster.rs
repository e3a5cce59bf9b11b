//! Raising an army from the units present at a battle

use tracing::{debug, info};

use crate::combat::army::Army;
use crate::combat::combatant::{Combatant, Rank};
use crate::combat::setup::Deployment;
use crate::combat::BattleContext;
use crate::core::types::{ItemId, UnitId};
use crate::roster::{Participant, Roster};

impl Army {
    /// Build one side's army, one combatant per man or monster
    ///
    /// Equipment is drawn from each unit as its figures are raised and
    /// goes back at settlement. Men of units fighting from behind start in
    /// the rear rank; their monsters stay in front. In an assassination only the leader's first figure
    /// fights.
    pub fn muster(
        ctx: &BattleContext,
        roster: &mut Roster,
        leader: UnitId,
        participants: &[Participant],
        deployment: Deployment,
    ) -> Army {
        let catalog = ctx.catalog;
        let mut soldiers = Vec::new();
        let mut tactician: Option<(UnitId, i32)> = None;

        for participant in participants {
            if deployment.assassination && participant.unit != leader {
                continue;
            }
            let (Some(unit), mut structure) = roster.unit_and_structure(participant) else {
                debug!(unit = participant.unit.0, "participant not in roster");
                continue;
            };
            unit.losses = 0;

            let tactics = unit.tactics(catalog);
            if tactician.map_or(true, |(_, best)| tactics > best) {
                tactician = Some((unit.id, tactics));
            }

            let figures: Vec<(ItemId, u32)> = unit
                .items
                .iter()
                .filter(|(item, _)| catalog.is_soldier(*item))
                .collect();
            'figures: for (race, num) in figures {
                let rank = if unit.behind && catalog.man(race).is_some() {
                    Rank::Rear
                } else {
                    Rank::Front
                };
                for _ in 0..num {
                    let mut soldier =
                        Combatant::setup(ctx, unit, race, structure.as_deref_mut(), deployment);
                    soldier.rank = rank;
                    soldiers.push(soldier);
                    if deployment.assassination {
                        break 'figures;
                    }
                }
            }
        }

        let mut army = Army::from_combatants(leader, soldiers, ctx.config.rout_policy);
        if let Some((unit_id, tactics)) = tactician {
            army.tactics = tactics;
            if let Some(unit) = roster.unit_mut(unit_id) {
                unit.practise(catalog.core().tactics);
            }
        }

        info!(
            leader = leader.0,
            soldiers = army.count(),
            front = army.num_front(),
            tactics = army.tactics,
            "army mustered"
        );
        army
    }
}
