//! Units and the fixed roster they are spawned from

use crate::{EngineError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Which side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Bot,
}

/// A single unit occupying a board cell.
///
/// Absence is modeled by the cell holding `None`, so there is no separate
/// presence flag to keep in sync. "Dead" is `hp <= 0`; clearing a dead unit
/// off the board is the move resolver's job, not combat's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    /// Movement radius, consumed by the input/UI collaborator only.
    pub move_range: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub offense: i32,
    pub defense: i32,
    pub offense_bonus: i32,
    pub defense_bonus: i32,
    pub faction: Faction,
}

impl Unit {
    pub fn new(
        name: &str,
        move_range: u32,
        hp: i32,
        offense: i32,
        defense: i32,
        faction: Faction,
    ) -> Self {
        Unit {
            name: name.to_string(),
            move_range,
            hp,
            max_hp: hp,
            offense,
            defense,
            offense_bonus: 0,
            defense_bonus: 0,
            faction,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Effective defense value, bonuses included. Offense bonuses are
    /// carried on the unit but do not feed combat; only defense bonuses do.
    pub fn defense_power(&self) -> i32 {
        self.defense + self.defense_bonus
    }
}

/// Registry of the unit templates the game can spawn.
///
/// Keyed by display name for lookup from setup code and the CLI.
#[derive(Debug, Clone)]
pub struct UnitRoster {
    templates: FxHashMap<String, Unit>,
}

impl UnitRoster {
    /// The standard five-unit roster: three player units, two bot units.
    pub fn standard() -> Self {
        let mut templates = FxHashMap::default();
        for unit in [
            Unit::new("Phonomancer", 2, 4, 6, 2, Faction::Player),
            Unit::new("Newt-Hands", 3, 5, 3, 2, Faction::Player),
            Unit::new("Lyndon B. Johnson", 2, 8, 3, 6, Faction::Player),
            Unit::new("Wizzy", 2, 5, 5, 3, Faction::Bot),
            Unit::new("Wing Centipede", 4, 6, 4, 2, Faction::Bot),
        ] {
            templates.insert(unit.name.clone(), unit);
        }
        UnitRoster { templates }
    }

    /// Look up a template by name and clone it for spawning.
    pub fn spawn(&self, name: &str) -> Result<Unit> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownUnit(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for UnitRoster {
    fn default() -> Self {
        Self::standard()
    }
}
