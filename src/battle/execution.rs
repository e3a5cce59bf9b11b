//! Battle execution loop
//!
//! Free round (tactics or assassin) -> normal rounds until one side breaks
//! -> pursuit free round against a routed survivor -> settlement.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::battle::log::{BattleEventType, BattleLog, Side};
use crate::catalog::SpecialFlag;
use crate::combat::setup::Deployment;
use crate::combat::spoils::distribute_spoils;
use crate::combat::{
    AttackOutcome, AttackSpec, Attacker, Army, BattleContext, RoundSummary, Settlement,
    SpoilsDistribution,
};
use crate::core::types::{ItemId, Round, SpecialId};
use crate::roster::items::ItemList;
use crate::roster::{Participant, Roster, Scenario};

/// Battle outcome, from the attacker's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Won,
    Lost,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assassination {
    Succeeded,
    Failed,
}

/// Everything a finished battle reports back to the turn processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    /// Normal rounds fought
    pub rounds: Round,
    #[serde(default)]
    pub assassination: Option<Assassination>,
    pub attacker: Settlement,
    pub defender: Settlement,
    /// Pool handed to the winners
    pub spoils: ItemList,
    pub distribution: SpoilsDistribution,
    pub log: BattleLog,
}

impl BattleResult {
    pub fn settlement(&self, side: Side) -> &Settlement {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }
}

/// Reference orchestrator: drives two armies through a battle
pub struct Battle<'a> {
    ctx: BattleContext<'a>,
    log: BattleLog,
    /// Round shown in log entries
    round: Round,
}

/// Snapshot of what an attacker swings with, taken before the volley so
/// the opposing army can be borrowed mutably
struct Striker {
    name: String,
    special: Option<(SpecialId, i32)>,
    riding: Option<ItemId>,
    mounted: bool,
}

impl<'a> Battle<'a> {
    pub fn new(ctx: BattleContext<'a>) -> Self {
        Self {
            ctx,
            log: BattleLog::new(),
            round: 0,
        }
    }

    /// Fight the battle a scenario describes, writing losses, equipment
    /// and spoils back to its roster
    pub fn run<R: Rng + ?Sized>(mut self, scenario: &mut Scenario, rng: &mut R) -> BattleResult {
        let ctx = self.ctx;
        let deployment = Deployment {
            terrain: scenario.terrain,
            assassination: scenario.assassination,
        };
        let is_assassination = scenario.assassination;

        let mut attackers = Army::muster(
            &ctx,
            &mut scenario.roster,
            scenario.attacker,
            &scenario.attackers,
            deployment,
        );
        let mut defenders = Army::muster(
            &ctx,
            &mut scenario.roster,
            scenario.defender,
            &scenario.defenders,
            deployment,
        );
        self.log.push(
            BattleEventType::BattleStarted {
                attackers: attackers.count(),
                defenders: defenders.count(),
            },
            format!(
                "{} attacks {}: {} against {}",
                side_name(&scenario.roster, &attackers),
                side_name(&scenario.roster, &defenders),
                attackers.count(),
                defenders.count()
            ),
            0,
        );

        // ===== OPENING =====
        if is_assassination {
            self.free_round(Side::Attacker, &mut attackers, &mut defenders, true, rng);
        } else if attackers.tactics > defenders.tactics {
            self.free_round(Side::Attacker, &mut attackers, &mut defenders, false, rng);
        } else if defenders.tactics > attackers.tactics {
            self.free_round(Side::Defender, &mut defenders, &mut attackers, false, rng);
        }

        // ===== MAIN ROUNDS =====
        let mut round = 1;
        while !attackers.broken() && !defenders.broken() && round <= ctx.config.max_rounds {
            self.normal_round(round, &mut attackers, &mut defenders, rng);
            round += 1;
        }
        let rounds = round - 1;

        // ===== RESOLUTION =====
        let attacker_lost = lost(&attackers, &defenders);
        let defender_lost = !attacker_lost && lost(&defenders, &attackers);

        let mut spoils = ItemList::new();
        let (outcome, attacker, defender, distribution) = if attacker_lost || defender_lost {
            let (loser_side, mut winner, mut loser, losers) = if attacker_lost {
                (Side::Attacker, defenders, attackers, &scenario.attackers)
            } else {
                (Side::Defender, attackers, defenders, &scenario.defenders)
            };

            if loser.num_alive() > 0 {
                info!(side = ?loser_side, "routed");
                self.log.push(
                    BattleEventType::Routed { side: loser_side },
                    format!("{} is routed!", side_name(&scenario.roster, &loser)),
                    self.round,
                );
                self.free_round(loser_side.opponent(), &mut winner, &mut loser, false, rng);
            } else {
                info!(side = ?loser_side, "destroyed");
                self.log.push(
                    BattleEventType::Destroyed { side: loser_side },
                    format!("{} is destroyed!", side_name(&scenario.roster, &loser)),
                    self.round,
                );
            }

            let lost_settlement = loser.lose(&ctx, &mut scenario.roster, &mut spoils, rng);
            collect_unit_spoils(&ctx, &mut scenario.roster, losers, &mut spoils, rng);
            let won_settlement = winner.win(&ctx, &mut scenario.roster, &mut spoils);
            let distribution = distribute_spoils(
                &spoils,
                &won_settlement.recipients,
                &mut scenario.roster,
                ctx.catalog,
            );

            if attacker_lost {
                (BattleOutcome::Lost, lost_settlement, won_settlement, distribution)
            } else {
                (BattleOutcome::Won, won_settlement, lost_settlement, distribution)
            }
        } else {
            let attacker = attackers.tie(&ctx, &mut scenario.roster);
            let defender = defenders.tie(&ctx, &mut scenario.roster);
            (BattleOutcome::Draw, attacker, defender, SpoilsDistribution::default())
        };

        let assassination = is_assassination.then(|| match outcome {
            BattleOutcome::Won => Assassination::Succeeded,
            _ => Assassination::Failed,
        });

        info!(?outcome, rounds, spoils = spoils.total(), "battle ended");
        let description = match outcome {
            BattleOutcome::Draw => "The battle ends indecisively.".to_string(),
            _ => format!("Battle ended: {:?}", outcome),
        };
        self.log.push(BattleEventType::BattleEnded { outcome }, description, self.round);

        BattleResult {
            outcome,
            rounds,
            assassination,
            attacker,
            defender,
            spoils,
            distribution,
            log: self.log,
        }
    }

    /// One side attacks while the other cannot strike back
    pub fn free_round<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        att: &mut Army,
        def: &mut Army,
        assassination: bool,
        rng: &mut R,
    ) {
        self.log.push(
            BattleEventType::FreeRound { side },
            format!("{:?} gets a free round of attacks.", side),
            self.round,
        );

        self.raise_shields(side, att);
        self.raise_shields(side.opponent(), def);
        att.round += 1;

        while att.can_attack() > 0 && def.num_alive() > 0 {
            let num = rng.gen_range(0..att.can_attack());
            let Some(attacker) = att.get_attacker(num) else {
                break;
            };
            self.do_attack(side, att.round, attacker, att, def, assassination, rng);
        }

        def.regenerate();
        let summary = def.end_round(&self.ctx, rng);
        self.report(side.opponent(), summary);
        att.reset();
    }

    /// Both sides attack in random interleaving until everyone has had a
    /// turn or one side is wiped out
    pub fn normal_round<R: Rng + ?Sized>(
        &mut self,
        round: Round,
        a: &mut Army,
        b: &mut Army,
        rng: &mut R,
    ) {
        self.round = round;
        self.log.push(BattleEventType::RoundStarted, format!("Round {}:", round), round);

        self.raise_shields(Side::Attacker, a);
        self.raise_shields(Side::Defender, b);
        a.round += 1;
        b.round += 1;

        loop {
            let (a_att, b_att) = (a.can_attack(), b.can_attack());
            if a.num_alive() == 0 || b.num_alive() == 0 || a_att + b_att == 0 {
                break;
            }

            let num = rng.gen_range(0..a_att + b_att);
            if num >= a_att {
                let Some(attacker) = b.get_attacker(num - a_att) else {
                    break;
                };
                self.do_attack(Side::Defender, b.round, attacker, b, a, false, rng);
            } else {
                let Some(attacker) = a.get_attacker(num) else {
                    break;
                };
                self.do_attack(Side::Attacker, a.round, attacker, a, b, false, rng);
            }
        }

        a.regenerate();
        b.regenerate();
        let a_summary = a.end_round(&self.ctx, rng);
        let b_summary = b.end_round(&self.ctx, rng);
        self.report(Side::Attacker, a_summary);
        self.report(Side::Defender, b_summary);

        a.reset();
        b.reset();
    }

    /// One combatant's turn: its special, its mount's special, then its
    /// weapon attacks
    #[allow(clippy::too_many_arguments)]
    fn do_attack<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        round: Round,
        attacker: Attacker,
        attackers: &mut Army,
        defenders: &mut Army,
        assassination: bool,
        rng: &mut R,
    ) {
        let catalog = self.ctx.catalog;
        let Some(soldier) = attackers.soldier(attacker.index) else {
            return;
        };
        let striker = Striker {
            name: soldier.name.clone(),
            special: soldier.special.map(|special| (special, soldier.special_level)),
            riding: soldier.riding,
            mounted: soldier.is_mounted(),
        };
        let weapon = soldier.weapon_attack(catalog);
        let attack_level = soldier.attack_skill;
        let mut num_attacks = soldier.attacks.in_round(round);

        if let Some((special, level)) = striker.special {
            self.special_attack(side, &striker, special, level, attackers, defenders, rng);
        }
        if defenders.num_alive() == 0 {
            return;
        }

        if !attacker.from_rear {
            let mount_special = striker
                .riding
                .and_then(|mount| catalog.mount(mount))
                .and_then(|mount| mount.special.map(|special| (special, mount.special_level)));
            if let Some((special, level)) = mount_special {
                self.special_attack(side, &striker, special, level, attackers, defenders, rng);
            }
        }
        if defenders.num_alive() == 0 {
            return;
        }

        let cap = self.ctx.config.max_assassin_free_attacks;
        if assassination && cap > 0 && num_attacks > cap {
            num_attacks = cap;
        }

        for _ in 0..num_attacks {
            if attacker.from_rear && !weapon.is_ranged() {
                break;
            }
            let spec = AttackSpec {
                special: None,
                attacks: 1,
                attack_type: Some(weapon.attack_type),
                attack_level,
                flags: &weapon.flags,
                class: weapon.class,
                effect: None,
                mount_bonus: weapon.mount_bonus,
                mounted: striker.mounted,
            };
            defenders.do_an_attack(&self.ctx, &spec, rng);
            if defenders.num_alive() == 0 {
                break;
            }
        }

        if let Some(soldier) = attackers.soldier_mut(attacker.index) {
            soldier.clear_one_shot_effects(catalog);
        }
    }

    /// Fire every damage entry of a special. Cleansing entries work on the
    /// caster's own army.
    #[allow(clippy::too_many_arguments)]
    fn special_attack<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        striker: &Striker,
        special_id: SpecialId,
        level: i32,
        attackers: &mut Army,
        defenders: &mut Army,
        rng: &mut R,
    ) {
        let catalog = self.ctx.catalog;
        let special = catalog.special(special_id);
        let use_level = special.has_flag(SpecialFlag::UseLevel);

        let mut total: Option<u32> = None;
        for damage in &special.damage {
            let times = damage.roll_times(level, use_level, rng);

            if let Some(effect) = damage.cleanse {
                let removed = attackers.remove_effects(times, effect, catalog, rng);
                *total.get_or_insert(0) += removed;
                continue;
            }

            let spec = AttackSpec {
                special: Some(special),
                attacks: times,
                attack_type: damage.attack_type,
                attack_level: level,
                flags: &damage.flags,
                class: damage.class,
                effect: damage.effect,
                mount_bonus: 0,
                mounted: striker.mounted,
            };
            match defenders.do_an_attack(&self.ctx, &spec, rng) {
                AttackOutcome::Blocked => {
                    self.log.push(
                        BattleEventType::ShieldBlocked {
                            side,
                            caster: striker.name.clone(),
                            special: special.name.clone(),
                        },
                        format!("{} {}, but it is deflected.", striker.name, special.description),
                        self.round,
                    );
                }
                outcome => *total.get_or_insert(0) += outcome.landed(),
            }
        }

        if let Some(landed) = total {
            debug!(caster = %striker.name, special = %special.name, landed, "special attack");
            self.log.push(
                BattleEventType::SpecialAttack {
                    side,
                    caster: striker.name.clone(),
                    special: special.name.clone(),
                    landed,
                },
                format!("{} {}, affecting {}.", striker.name, special.description, landed),
                self.round,
            );
        }
    }

    fn raise_shields(&mut self, side: Side, army: &mut Army) {
        let catalog = self.ctx.catalog;
        army.refresh_shields(catalog);
        for soldier in army.survivors() {
            let Some(special) = soldier.special.map(|id| catalog.special(id)) else {
                continue;
            };
            if special.has_flag(SpecialFlag::Shield) {
                self.log.push(
                    BattleEventType::ShieldRaised {
                        side,
                        caster: soldier.name.clone(),
                        special: special.name.clone(),
                    },
                    format!("{} {}.", soldier.name, special.description),
                    self.round,
                );
            }
        }
    }

    fn report(&mut self, side: Side, summary: RoundSummary) {
        info!(
            ?side,
            round = summary.round,
            losses = summary.losses(),
            healed = summary.healed,
            alive = summary.alive,
            "round ended"
        );
        self.log.push(
            BattleEventType::Casualties { side, summary: summary.clone() },
            format!(
                "{:?}: {} lost, {} healed, {} left.",
                side,
                summary.losses(),
                summary.healed,
                summary.alive
            ),
            self.round,
        );
    }
}

/// `army` lost if it broke while the other held, or was wiped out while
/// the other still stands
fn lost(army: &Army, other: &Army) -> bool {
    (army.broken() && !other.broken()) || (army.num_alive() == 0 && other.num_alive() > 0)
}

fn side_name(roster: &Roster, army: &Army) -> String {
    roster
        .unit(army.leader)
        .map(|unit| unit.faction.clone())
        .unwrap_or_else(|| format!("Unit {}", army.leader.0))
}

/// Take the losers' carried goods in proportion to the figures they lost;
/// half of what is taken, rounded at random, survives as spoils
pub fn collect_unit_spoils<R: Rng + ?Sized>(
    ctx: &BattleContext,
    roster: &mut Roster,
    losers: &[Participant],
    spoils: &mut ItemList,
    rng: &mut R,
) {
    for participant in losers {
        let Some(unit) = roster.unit_mut(participant.unit) else {
            continue;
        };
        let alive = unit.soldiers(ctx.catalog) as u64;
        let dead = unit.losses as u64;
        if dead == 0 {
            continue;
        }

        let goods: Vec<(ItemId, u32)> = unit
            .items
            .iter()
            .filter(|(item, _)| !ctx.catalog.is_soldier(*item))
            .collect();
        for (item, num) in goods {
            let taken = (num as u64 * dead / (alive + dead)) as u32;
            let kept = (taken + rng.gen_range(0..2)) / 2;
            spoils.add(item, kept);
            unit.items.set(item, num - taken);
        }
    }
}
