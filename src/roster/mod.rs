//! Unit rosters: where armies come from and where equipment goes back to

pub mod items;
pub mod scenario;
pub mod unit;

use serde::{Deserialize, Serialize};

pub use items::{ItemList, ItemStack};
pub use scenario::Scenario;
pub use unit::{GuardStatus, SpoilsPolicy, Unit, UnitKind};

use crate::core::types::{StructureKind, UnitId};

/// A fortification soldiers can fight from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    pub kind: StructureKind,
    /// Soldiers it can still protect
    pub capacity: u32,
    /// Rune level, raising energy and spirit defense
    #[serde(default)]
    pub runes: i32,
}

/// A unit taking part in a battle, possibly from inside a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub unit: UnitId,
    /// Index into `Roster::structures`
    #[serde(default)]
    pub structure: Option<usize>,
}

impl Participant {
    pub fn in_the_open(unit: UnitId) -> Self {
        Self { unit, structure: None }
    }

    pub fn inside(unit: UnitId, structure: usize) -> Self {
        Self {
            unit,
            structure: Some(structure),
        }
    }
}

/// Every unit and structure at a battle location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub units: Vec<Unit>,
    #[serde(default)]
    pub structures: Vec<Structure>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn add_structure(&mut self, structure: Structure) -> usize {
        self.structures.push(structure);
        self.structures.len() - 1
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    /// Mutable access to a unit and the structure it fights from
    pub fn unit_and_structure(
        &mut self,
        participant: &Participant,
    ) -> (Option<&mut Unit>, Option<&mut Structure>) {
        let unit = self.units.iter_mut().find(|unit| unit.id == participant.unit);
        let structure = participant
            .structure
            .and_then(|index| self.structures.get_mut(index));
        (unit, structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_lookup() {
        let mut roster = Roster::new();
        roster.add_unit(Unit::new(UnitId(3), "Guards", "City", UnitKind::Guard));
        roster.add_unit(Unit::new(UnitId(9), "Raiders", "Norse", UnitKind::Normal));

        assert_eq!(roster.unit(UnitId(9)).map(|u| u.name.as_str()), Some("Raiders"));
        assert!(roster.unit(UnitId(4)).is_none());

        roster.unit_mut(UnitId(3)).unwrap().behind = true;
        assert!(roster.unit(UnitId(3)).unwrap().behind);
    }

    #[test]
    fn test_unit_and_structure_borrow_together() {
        let mut roster = Roster::new();
        roster.add_unit(Unit::new(UnitId(1), "Garrison", "City", UnitKind::Guard));
        let keep = roster.add_structure(Structure {
            name: "Keep".into(),
            kind: StructureKind(2),
            capacity: 10,
            runes: 0,
        });

        let (unit, structure) = roster.unit_and_structure(&Participant::inside(UnitId(1), keep));
        let structure = structure.unwrap();
        structure.capacity -= 1;
        unit.unwrap().losses = 1;

        assert_eq!(roster.structures[keep].capacity, 9);
    }
}
