//! Load a battle setup from TOML
//!
//! Scenario files name items and skills by abbreviation; they are resolved
//! against a catalog while loading.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::core::error::{Result, WarbandError};
use crate::core::types::{Terrain, UnitId};
use crate::roster::unit::{GuardStatus, SpoilsPolicy, Unit, UnitKind};
use crate::roster::{Participant, Roster, Structure};

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    name: String,
    #[serde(default = "Terrain::open")]
    terrain: Terrain,
    #[serde(default)]
    structures: Vec<Structure>,
    units: Vec<UnitSpec>,
    battle: BattleSpec,
}

#[derive(Debug, Deserialize)]
struct UnitSpec {
    id: u32,
    name: String,
    #[serde(default)]
    faction: String,
    #[serde(default)]
    kind: UnitKind,
    #[serde(default)]
    items: BTreeMap<String, u32>,
    #[serde(default)]
    skills: BTreeMap<String, i32>,
    #[serde(default)]
    behind: bool,
    #[serde(default)]
    spoils: SpoilsPolicy,
    #[serde(default)]
    guard: GuardStatus,
    #[serde(default)]
    ready_weapons: Vec<String>,
    #[serde(default)]
    ready_armor: Vec<String>,
    #[serde(default)]
    ready_item: Option<String>,
    #[serde(default)]
    combat_spell: Option<String>,
    #[serde(default)]
    free: u32,
}

#[derive(Debug, Deserialize)]
struct BattleSpec {
    attacker: u32,
    defender: u32,
    #[serde(default)]
    attackers: Vec<Participant>,
    #[serde(default)]
    defenders: Vec<Participant>,
    #[serde(default)]
    assassination: bool,
}

/// A resolved battle setup
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub terrain: Terrain,
    pub roster: Roster,
    pub attacker: UnitId,
    pub defender: UnitId,
    pub attackers: Vec<Participant>,
    pub defenders: Vec<Participant>,
    pub assassination: bool,
}

impl Scenario {
    pub fn from_toml_str(content: &str, catalog: &Catalog) -> Result<Self> {
        let file: ScenarioFile = toml::from_str(content)?;
        Self::resolve(file, catalog)
    }

    pub fn load(path: &Path, catalog: &Catalog) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content, catalog)
    }

    fn resolve(file: ScenarioFile, catalog: &Catalog) -> Result<Self> {
        let mut roster = Roster::new();
        roster.structures = file.structures;

        for spec in file.units {
            if roster.unit(UnitId(spec.id)).is_some() {
                return Err(invalid(format!("unit {} is defined twice", spec.id)));
            }
            roster.add_unit(resolve_unit(spec, catalog)?);
        }

        // A unit listed as neither attacker nor defender fights for its leader
        let mut attackers = file.battle.attackers;
        if attackers.is_empty() {
            attackers.push(Participant::in_the_open(UnitId(file.battle.attacker)));
        }
        let mut defenders = file.battle.defenders;
        if defenders.is_empty() {
            defenders.push(Participant::in_the_open(UnitId(file.battle.defender)));
        }

        let scenario = Scenario {
            name: file.name,
            terrain: file.terrain,
            roster,
            attacker: UnitId(file.battle.attacker),
            defender: UnitId(file.battle.defender),
            attackers,
            defenders,
            assassination: file.battle.assassination,
        };
        scenario.validate(catalog)?;
        Ok(scenario)
    }

    /// Check that both sides exist, are disjoint, and can field soldiers
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (side, leader, participants) in [
            ("attacking", self.attacker, &self.attackers),
            ("defending", self.defender, &self.defenders),
        ] {
            if !participants.iter().any(|p| p.unit == leader) {
                return Err(invalid(format!(
                    "{} leader {} is not among the {} units",
                    side, leader.0, side
                )));
            }

            let mut soldiers = 0;
            for participant in participants {
                let unit = self.roster.unit(participant.unit).ok_or_else(|| {
                    invalid(format!("{} unit {} does not exist", side, participant.unit.0))
                })?;
                if !seen.insert(participant.unit) {
                    return Err(invalid(format!(
                        "unit {} takes part more than once",
                        participant.unit.0
                    )));
                }
                if let Some(index) = participant.structure {
                    if index >= self.roster.structures.len() {
                        return Err(invalid(format!(
                            "unit {} is in unknown structure {}",
                            participant.unit.0, index
                        )));
                    }
                }
                soldiers += unit.soldiers(catalog);
            }

            if soldiers == 0 {
                return Err(invalid(format!("the {} side has no soldiers", side)));
            }
        }

        if self.assassination {
            for leader in [self.attacker, self.defender] {
                let has_man = self.roster.unit(leader).map_or(false, |unit| {
                    unit.items.iter().any(|(item, _)| catalog.man(item).is_some())
                });
                if !has_man {
                    return Err(invalid(format!(
                        "assassination needs a man in unit {}",
                        leader.0
                    )));
                }
            }
        }

        Ok(())
    }
}

fn resolve_unit(spec: UnitSpec, catalog: &Catalog) -> Result<Unit> {
    let mut unit = Unit::new(UnitId(spec.id), &spec.name, &spec.faction, spec.kind);
    unit.behind = spec.behind;
    unit.spoils = spec.spoils;
    unit.guard = spec.guard;
    unit.free = spec.free;

    for (abbr, num) in &spec.items {
        unit.items.add(catalog.lookup_item(abbr)?, *num);
    }
    for (abbr, level) in &spec.skills {
        unit.set_skill(catalog.lookup_skill(abbr)?, *level);
    }
    for abbr in &spec.ready_weapons {
        let item = catalog.lookup_item(abbr)?;
        if catalog.weapon(item).is_none() {
            return Err(invalid(format!("{} is not a weapon", abbr)));
        }
        unit.ready_weapons.push(item);
    }
    for abbr in &spec.ready_armor {
        let item = catalog.lookup_item(abbr)?;
        if catalog.armor(item).is_none() {
            return Err(invalid(format!("{} is not armor", abbr)));
        }
        unit.ready_armor.push(item);
    }
    if let Some(abbr) = &spec.ready_item {
        let item = catalog.lookup_item(abbr)?;
        if catalog.battle_item(item).is_none() {
            return Err(invalid(format!("{} is not a battle item", abbr)));
        }
        unit.ready_item = Some(item);
    }
    if let Some(abbr) = &spec.combat_spell {
        unit.combat_spell = Some(catalog.lookup_skill(abbr)?);
    }

    Ok(unit)
}

fn invalid(message: String) -> WarbandError {
    WarbandError::InvalidScenario(message)
}
