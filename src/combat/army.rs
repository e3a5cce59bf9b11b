//! One side of a battle
//!
//! Combatants keep their slot for the whole battle; a fallen combatant's
//! slot stays in place and is skipped. Every living combatant is in exactly
//! one of four buckets (ready/spent x front/rear), tracked by `RankCounts`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, SpecialDef, SpecialFlag, TargetFilter, WeaponFlag, WeaponLength};
use crate::combat::combatant::{Combatant, Rank};
use crate::combat::hits::attack_hits;
use crate::combat::shields::ShieldRegistry;
use crate::combat::BattleContext;
use crate::core::config::RoutPolicy;
use crate::core::types::{AttackBin, AttackType, BinTally, EffectId, Round, UnitId, WeaponClass};

/// Living combatants per rank and readiness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankCounts {
    pub ready_front: usize,
    pub ready_rear: usize,
    pub spent_front: usize,
    pub spent_rear: usize,
}

impl RankCounts {
    pub fn total(&self) -> usize {
        self.ready_front + self.ready_rear + self.spent_front + self.spent_rear
    }

    fn bucket(&mut self, rank: Rank, ready: bool) -> &mut usize {
        match (rank, ready) {
            (Rank::Front, true) => &mut self.ready_front,
            (Rank::Rear, true) => &mut self.ready_rear,
            (Rank::Front, false) => &mut self.spent_front,
            (Rank::Rear, false) => &mut self.spent_rear,
        }
    }
}

/// The combatant chosen for an attack slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attacker {
    pub index: usize,
    /// Picked from the rear rank
    pub from_rear: bool,
}

/// One volley of attacks against this army
#[derive(Debug, Clone, Copy)]
pub struct AttackSpec<'s> {
    /// Special ability behind the attack, for target filters
    pub special: Option<&'s SpecialDef>,
    pub attacks: u32,
    /// `None` for attacks that cannot be blocked or missed
    pub attack_type: Option<AttackType>,
    pub attack_level: i32,
    pub flags: &'s [WeaponFlag],
    pub class: WeaponClass,
    /// Effect applied instead of damage
    pub effect: Option<EffectId>,
    /// Extra attack against mounted targets
    pub mount_bonus: i32,
    /// Whether the attacker rides, for the kill tally
    pub mounted: bool,
}

impl<'s> AttackSpec<'s> {
    /// A plain attack with no special, no effect and no mount bonus
    pub fn basic(attack_type: AttackType, attack_level: i32, attacks: u32) -> Self {
        Self {
            special: None,
            attacks,
            attack_type: Some(attack_type),
            attack_level,
            flags: &[],
            class: WeaponClass::Slashing,
            effect: None,
            mount_bonus: 0,
            mounted: false,
        }
    }
}

/// Result of one volley
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Stopped by a shield before any target was chosen
    Blocked,
    Struck {
        /// Hits that did damage or set the effect
        landed: u32,
        killed: u32,
    },
}

impl AttackOutcome {
    pub fn landed(&self) -> u32 {
        match self {
            AttackOutcome::Blocked => 0,
            AttackOutcome::Struck { landed, .. } => *landed,
        }
    }

    pub fn killed(&self) -> u32 {
        match self {
            AttackOutcome::Blocked => 0,
            AttackOutcome::Struck { killed, .. } => *killed,
        }
    }
}

/// Per-round casualty report, by attack category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: Round,
    pub hits_from: BinTally,
    pub kills_from: BinTally,
    /// Patients successfully treated this round
    pub healed: u32,
    pub alive: usize,
}

impl RoundSummary {
    pub fn losses(&self) -> u32 {
        self.kills_from.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Army {
    pub(super) soldiers: Vec<Combatant>,
    pub leader: UnitId,
    pub shields: ShieldRegistry,
    pub round: Round,
    pub tactics: i32,
    pub rout_policy: RoutPolicy,
    counts: RankCounts,
    /// Combatants at the start of the battle
    count: usize,
    hits_alive: i64,
    hits_total: i64,
    pub hits_from: BinTally,
    pub kills_from: BinTally,
}

impl Army {
    /// Build an army from ready-made combatants
    ///
    /// If nobody stands in the front rank, the whole army fights in front.
    pub fn from_combatants(leader: UnitId, mut soldiers: Vec<Combatant>, rout_policy: RoutPolicy) -> Self {
        if !soldiers.iter().any(|s| s.is_alive() && s.rank == Rank::Front) {
            for soldier in soldiers.iter_mut() {
                soldier.rank = Rank::Front;
            }
        }

        let hits_total: i64 = soldiers.iter().map(|s| s.hits.max(0) as i64).sum();
        let mut army = Self {
            count: soldiers.len(),
            soldiers,
            leader,
            shields: ShieldRegistry::new(),
            round: 0,
            tactics: 0,
            rout_policy,
            counts: RankCounts::default(),
            hits_alive: hits_total,
            hits_total,
            hits_from: [0; AttackBin::COUNT],
            kills_from: [0; AttackBin::COUNT],
        };
        army.reset();
        army
    }

    pub fn soldiers(&self) -> &[Combatant] {
        &self.soldiers
    }

    pub fn soldier(&self, index: usize) -> Option<&Combatant> {
        self.soldiers.get(index)
    }

    /// Mutable access for effect and healing bookkeeping; rank, readiness
    /// and hits must go through the army
    pub fn soldier_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.soldiers.get_mut(index)
    }

    pub fn counts(&self) -> RankCounts {
        self.counts
    }

    /// Starting number of combatants
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn num_alive(&self) -> usize {
        self.counts.total()
    }

    pub fn num_dead(&self) -> usize {
        self.count - self.num_alive()
    }

    /// Combatants that have not attacked yet this round
    pub fn can_attack(&self) -> usize {
        self.counts.ready_front + self.counts.ready_rear
    }

    /// Living combatants in the front rank
    pub fn num_front(&self) -> usize {
        self.counts.ready_front + self.counts.spent_front
    }

    pub fn hits_alive(&self) -> i64 {
        self.hits_alive
    }

    pub fn hits_total(&self) -> i64 {
        self.hits_total
    }

    /// Every living combatant is ready to attack again
    pub fn reset(&mut self) {
        let mut counts = RankCounts::default();
        for soldier in self.soldiers.iter_mut().filter(|s| s.is_alive()) {
            soldier.ready = true;
            *counts.bucket(soldier.rank, true) += 1;
        }
        self.counts = counts;
    }

    /// Combatant for attack slot `i`: the i-th ready front combatant, or
    /// failing that a ready rear one, in slot order. It is marked spent.
    pub fn get_attacker(&mut self, i: usize) -> Option<Attacker> {
        let (rank, nth) = if i < self.counts.ready_front {
            (Rank::Front, i)
        } else if i < self.can_attack() {
            (Rank::Rear, i - self.counts.ready_front)
        } else {
            return None;
        };

        let index = self
            .soldiers
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_alive() && s.ready && s.rank == rank)
            .map(|(index, _)| index)
            .nth(nth)?;

        self.soldiers[index].ready = false;
        *self.counts.bucket(rank, true) -= 1;
        *self.counts.bucket(rank, false) += 1;
        self.check_counts();

        Some(Attacker {
            index,
            from_rear: rank == Rank::Rear,
        })
    }

    /// Once the front rank is gone, the rear rank becomes the front
    fn promote_rear(&mut self) {
        for soldier in self.soldiers.iter_mut().filter(|s| s.is_alive()) {
            soldier.rank = Rank::Front;
        }
        self.counts.ready_front += self.counts.ready_rear;
        self.counts.spent_front += self.counts.spent_rear;
        self.counts.ready_rear = 0;
        self.counts.spent_rear = 0;
    }

    fn front_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.soldiers
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_alive() && s.rank == Rank::Front)
            .map(|(index, _)| index)
    }

    /// Pick a living front-rank target uniformly at random, restricted to
    /// what `special` may hit
    pub fn get_target_num<R: Rng + ?Sized>(
        &mut self,
        special: Option<&SpecialDef>,
        rng: &mut R,
    ) -> Option<usize> {
        if self.num_front() == 0 {
            self.promote_rear();
            if self.num_front() == 0 {
                return None;
            }
        }

        let special = special.filter(|special| special.is_targeted());
        let candidates = self.valid_targets(special).count();
        if candidates == 0 {
            return None;
        }
        let pick = rng.gen_range(0..candidates);
        self.valid_targets(special).nth(pick)
    }

    fn valid_targets<'a>(
        &'a self,
        special: Option<&'a SpecialDef>,
    ) -> impl Iterator<Item = usize> + 'a {
        self.front_indices().filter(move |index| {
            special.map_or(true, |special| self.check_special_target(special, *index))
        })
    }

    /// Whether the combatant in `index` passes every filter of `special`
    pub fn check_special_target(&self, special: &SpecialDef, index: usize) -> bool {
        let Some(target) = self.soldiers.get(index) else {
            return false;
        };

        for filter in &special.targets {
            let passes = match filter {
                TargetFilter::BuildingIf => target
                    .building
                    .map_or(false, |kind| special.buildings.contains(&kind)),
                TargetFilter::BuildingExcept => target
                    .building
                    .map_or(false, |kind| !special.buildings.contains(&kind)),
                TargetFilter::SoldierIf => special.races.contains(&target.race),
                TargetFilter::SoldierExcept => !special.races.contains(&target.race),
                TargetFilter::MountIf => target
                    .riding
                    .map_or(false, |mount| special.mounts.contains(&mount)),
                TargetFilter::MountExcept => target
                    .riding
                    .map_or(false, |mount| !special.mounts.contains(&mount)),
                TargetFilter::EffectIf => special.effects.iter().any(|e| target.has_effect(*e)),
                TargetFilter::EffectExcept => !special.effects.iter().any(|e| target.has_effect(*e)),
                TargetFilter::Illusion => target.illusion,
                TargetFilter::NoMonster => !target.monster,
            };
            if !passes {
                return false;
            }
        }
        true
    }

    /// Pick a living front-rank combatant bearing `effect`
    pub fn get_effect_num<R: Rng + ?Sized>(&self, effect: EffectId, rng: &mut R) -> Option<usize> {
        let candidates = self.effect_bearers(effect).count();
        if candidates == 0 {
            return None;
        }
        let pick = rng.gen_range(0..candidates);
        self.effect_bearers(effect).nth(pick)
    }

    fn effect_bearers(&self, effect: EffectId) -> impl Iterator<Item = usize> + '_ {
        self.front_indices()
            .filter(move |index| self.soldiers[*index].has_effect(effect))
    }

    /// Clear `effect` from up to `num` front-rank bearers, returning how
    /// many were cleared
    pub fn remove_effects<R: Rng + ?Sized>(
        &mut self,
        num: u32,
        effect: EffectId,
        catalog: &Catalog,
        rng: &mut R,
    ) -> u32 {
        let mut removed = 0;
        for _ in 0..num {
            let Some(index) = self.get_effect_num(effect, rng) else {
                break;
            };
            self.soldiers[index].clear_effect(effect, catalog);
            removed += 1;
        }
        removed
    }

    /// Resolve a volley of attacks against this army
    pub fn do_an_attack<R: Rng + ?Sized>(
        &mut self,
        ctx: &BattleContext,
        attack: &AttackSpec,
        rng: &mut R,
    ) -> AttackOutcome {
        let scale = ctx.config.combat_scale;

        if let Some(attack_type) = attack.attack_type.filter(|t| t.shieldable()) {
            if let Some(high) = self.shields.high_shield(attack_type) {
                let level = self.shields.get(high).map_or(0, |shield| shield.level);
                if !attack_hits(attack.attack_level, level, scale, rng) {
                    return AttackOutcome::Blocked;
                }
                // A killing spell that gets through breaks the shield
                if attack.effect.is_none() && !attack_type.is_physical() {
                    self.shields.remove(high);
                    debug!(?attack_type, level, "shield broken");
                }
            }
        }

        // Unblockable damage is tallied as melee
        let bin = attack.attack_type.map_or(AttackBin::Melee, |attack_type| {
            AttackBin::classify(attack_type, attack.mounted)
        });
        let attacker_length = WeaponLength::from_flags(attack.flags);
        let ranged = attack.flags.contains(&WeaponFlag::Ranged);
        let no_building = attack
            .special
            .map_or(false, |special| special.has_flag(SpecialFlag::NoBuilding));

        let mut landed = 0;
        let mut killed = 0;
        for _ in 0..attack.attacks {
            let Some(index) = self.get_target_num(attack.special, rng) else {
                break;
            };
            let target = &self.soldiers[index];

            let mut attack_level = attack.attack_level;
            let mut defense = attack
                .attack_type
                .map_or(0, |attack_type| target.defense[attack_type.index()]);

            if no_building && target.building.is_some() {
                defense -= 2;
            }
            if attack.flags.contains(&WeaponFlag::NoDefense) && defense > 0 {
                defense = 0;
            }
            if !ranged {
                let target_length = target.defending_length(ctx.catalog);
                if attacker_length > target_length {
                    attack_level += 1;
                } else if target_length > attacker_length {
                    defense += 1;
                }
            }
            if target.is_mounted() {
                attack_level += attack.mount_bonus;
            }

            if attack.attack_type.is_some() {
                if !attack.flags.contains(&WeaponFlag::AlwaysReady) && rng.gen_bool(0.5) {
                    continue;
                }
                if !attack_hits(attack_level, defense, scale, rng) {
                    continue;
                }
            }

            match attack.effect {
                None => {
                    if target.armor_saves(attack.class, ctx.catalog, rng) {
                        continue;
                    }
                    let died = self.damage_soldier(index);
                    self.hits_from[bin.index()] += 1;
                    if died {
                        self.kills_from[bin.index()] += 1;
                        killed += 1;
                    }
                    landed += 1;
                }
                Some(effect) => {
                    if target.has_effect(effect) {
                        continue;
                    }
                    self.soldiers[index].set_effect(effect, ctx.catalog);
                    landed += 1;
                }
            }
        }

        AttackOutcome::Struck { landed, killed }
    }

    /// Apply one point of damage, returning whether the combatant fell
    pub fn damage_soldier(&mut self, index: usize) -> bool {
        let rout_policy = self.rout_policy;
        let Some(soldier) = self.soldiers.get_mut(index) else {
            return false;
        };
        if !soldier.is_alive() || soldier.invulnerable {
            return false;
        }

        if rout_policy == RoutPolicy::HitsIndividual {
            self.hits_alive -= 1;
        }
        soldier.damage += 1;
        soldier.hits = (soldier.hits - 1).max(0);
        if soldier.hits > 0 {
            return false;
        }

        if rout_policy != RoutPolicy::HitsIndividual {
            self.hits_alive -= soldier.max_hits as i64;
        }
        let (rank, ready) = (soldier.rank, soldier.ready);
        *self.counts.bucket(rank, ready) -= 1;
        self.check_counts();
        true
    }

    /// Give back up to `amount` hits to a living combatant, returning how
    /// many it took
    pub(super) fn restore_hits(&mut self, index: usize, amount: i32) -> i32 {
        let Some(soldier) = self.soldiers.get_mut(index) else {
            return 0;
        };
        if !soldier.is_alive() {
            return 0;
        }
        let restored = amount.min(soldier.max_hits - soldier.hits).max(0);
        soldier.hits += restored;
        if self.rout_policy == RoutPolicy::HitsIndividual {
            self.hits_alive = (self.hits_alive + restored as i64).min(self.hits_total);
        }
        restored
    }

    /// Has this army lost more than half of its strength?
    pub fn broken(&self) -> bool {
        match self.rout_policy {
            RoutPolicy::Figures => self.num_alive() * 2 < self.count,
            RoutPolicy::HitsIndividual | RoutPolicy::HitsPerFigure => {
                self.hits_alive * 2 < self.hits_total
            }
        }
    }

    /// Rebuild the shield registry from living shield casters
    pub fn refresh_shields(&mut self, catalog: &Catalog) {
        self.shields.clear();
        for soldier in self.soldiers.iter().filter(|s| s.is_alive()) {
            let Some(special) = soldier.special.map(|id| catalog.special(id)) else {
                continue;
            };
            if !special.has_flag(SpecialFlag::Shield) {
                continue;
            }
            for attack_type in special.shield_types() {
                self.shields.add(attack_type, soldier.special_level);
            }
            debug!(caster = %soldier.name, shield = %special.name, "shield raised");
        }
    }

    /// Close the round: heal, clear one-shot effects, and report the
    /// round's casualties
    pub fn end_round<R: Rng + ?Sized>(&mut self, ctx: &BattleContext, rng: &mut R) -> RoundSummary {
        let healed = self.do_heal(ctx, rng);
        for soldier in self.soldiers.iter_mut().filter(|s| s.is_alive()) {
            soldier.clear_one_shot_effects(ctx.catalog);
        }

        let summary = RoundSummary {
            round: self.round,
            hits_from: self.hits_from,
            kills_from: self.kills_from,
            healed,
            alive: self.num_alive(),
        };
        self.hits_from = [0; AttackBin::COUNT];
        self.kills_from = [0; AttackBin::COUNT];
        summary
    }

    /// Surviving combatants in slot order
    pub fn survivors(&self) -> impl Iterator<Item = &Combatant> {
        self.soldiers.iter().filter(|s| s.is_alive())
    }

    pub(super) fn check_counts(&self) {
        debug_assert_eq!(
            self.counts.total(),
            self.soldiers.iter().filter(|s| s.is_alive()).count(),
            "rank counts out of step with the roster"
        );
    }
}
