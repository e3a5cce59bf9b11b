//! Battlefield healing and regeneration

use rand::Rng;
use tracing::debug;

use crate::combat::army::Army;
use crate::combat::BattleContext;

impl Army {
    /// Living, damaged combatants that have not been given up on
    fn patients(&self) -> impl Iterator<Item = usize> + '_ {
        self.soldiers
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_damaged() && s.can_be_healed)
            .map(|(index, _)| index)
    }

    pub fn can_be_healed(&self) -> bool {
        self.patients().next().is_some()
    }

    /// Mundane healing, then magical healing from the strongest level down
    ///
    /// Returns the number of hits restored.
    pub fn do_heal<R: Rng + ?Sized>(&mut self, ctx: &BattleContext, rng: &mut R) -> u32 {
        let mut healed = self.do_heal_level(ctx, 1, true, rng);
        for heal_type in (1..=ctx.catalog.healing.max_type()).rev() {
            healed += self.do_heal_level(ctx, heal_type, false, rng);
        }
        healed
    }

    fn do_heal_level<R: Rng + ?Sized>(
        &mut self,
        ctx: &BattleContext,
        heal_type: u32,
        use_items: bool,
        rng: &mut R,
    ) -> u32 {
        let rate = ctx.catalog.healing.rate(heal_type);
        let mut healed = 0;

        for healer in 0..self.soldiers.len() {
            if !self.can_be_healed() {
                break;
            }
            let soldier = &self.soldiers[healer];
            if !soldier.is_alive()
                || soldier.heal_type != heal_type
                || soldier.healing == 0
                || soldier.heal_item.is_some() != use_items
            {
                continue;
            }

            let mut treated = 0;
            while self.soldiers[healer].healing > 0 {
                let candidates = self.patients().count();
                if candidates == 0 {
                    break;
                }
                let pick = rng.gen_range(0..candidates);
                let Some(patient) = self.patients().nth(pick) else {
                    break;
                };

                self.soldiers[healer].healing -= 1;
                if rng.gen_range(0..100) < rate {
                    treated += self.restore_hits(patient, 1) as u32;
                } else {
                    self.soldiers[patient].can_be_healed = false;
                }
            }

            if treated > 0 {
                debug!(healer = %self.soldiers[healer].name, treated, heal_type, "healing");
            }
            healed += treated;
        }
        healed
    }

    /// Restore hits to living combatants that regenerate; everyone's
    /// per-round damage is forgotten. Returns the hits restored.
    pub fn regenerate(&mut self) -> u32 {
        let mut restored = 0;
        for index in 0..self.soldiers.len() {
            let soldier = &mut self.soldiers[index];
            if !soldier.is_alive() || soldier.hits >= soldier.max_hits {
                continue;
            }
            soldier.damage = 0;
            let regen = soldier.regen;
            if regen > 0 {
                let regen = self.restore_hits(index, regen);
                restored += regen as u32;
                let soldier = &self.soldiers[index];
                debug!(
                    name = %soldier.name,
                    regen,
                    hits = soldier.hits,
                    max_hits = soldier.max_hits,
                    "regenerates"
                );
            }
        }
        restored
    }
}
