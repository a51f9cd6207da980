//! Home base economy: storage and barracks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::Resource;

/// Lowest building level.
pub const MIN_LEVEL: u8 = 1;

/// Highest building level.
pub const MAX_LEVEL: u8 = 10;

/// Money cost per level before the growth multiplier.
const UPGRADE_MONEY_PER_LEVEL: f64 = 200.0;

/// Growth multiplier on the money cost.
const UPGRADE_MONEY_GROWTH: f64 = 1.5;

/// Ammo/food ceiling at level zero.
const STORAGE_BASE: u32 = 500;

/// Ammo/food ceiling added per storage level.
const STORAGE_PER_LEVEL: u32 = 100;

/// Money ceiling is this multiple of the ammo/food ceiling.
const MONEY_CAPACITY_MULTIPLIER: u32 = 2;

/// Unit ceiling at level zero.
const BARRACKS_BASE: u32 = 10;

/// Unit ceiling added per barracks level.
const BARRACKS_PER_LEVEL: u32 = 5;

/// The two upgradeable buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Raises money/ammo/food ceilings.
    Storage,
    /// Raises the unit ceiling.
    Barracks,
}

impl BuildingKind {
    /// Both buildings.
    pub const ALL: [BuildingKind; 2] = [BuildingKind::Storage, BuildingKind::Barracks];

    /// Lowercase name used on the command line and in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BuildingKind::Storage => "storage",
            BuildingKind::Barracks => "barracks",
        }
    }

    /// Cost of upgrading this building from `level` to `level + 1`.
    ///
    /// Money is `floor(200 × level × 1.5)`. Storage costs `2L` ammo and `3L`
    /// food, barracks `3L` ammo and `2L` food.
    #[must_use]
    pub fn upgrade_cost(self, level: u8) -> Resource {
        let level = u32::from(level);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let money =
            (UPGRADE_MONEY_PER_LEVEL * f64::from(level) * UPGRADE_MONEY_GROWTH).floor() as u32;
        let (ammo, food) = match self {
            BuildingKind::Storage => (level * 2, level * 3),
            BuildingKind::Barracks => (level * 3, level * 2),
        };
        Resource::new(money, ammo, food, 0)
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown building: {s}"))
    }
}

/// The player's home base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBase {
    /// Storage level in `[1, 10]`.
    pub storage_level: u8,
    /// Barracks level in `[1, 10]`.
    pub barracks_level: u8,
}

impl Default for PlayerBase {
    fn default() -> Self {
        Self {
            storage_level: MIN_LEVEL,
            barracks_level: MIN_LEVEL,
        }
    }
}

impl PlayerBase {
    /// Current level of a building.
    #[must_use]
    pub const fn level(self, kind: BuildingKind) -> u8 {
        match kind {
            BuildingKind::Storage => self.storage_level,
            BuildingKind::Barracks => self.barracks_level,
        }
    }

    /// Whether the building is at the top level.
    #[must_use]
    pub const fn is_maxed(self, kind: BuildingKind) -> bool {
        self.level(kind) >= MAX_LEVEL
    }

    /// Cost of the next upgrade, or `None` at max level.
    #[must_use]
    pub fn next_upgrade_cost(self, kind: BuildingKind) -> Option<Resource> {
        if self.is_maxed(kind) {
            None
        } else {
            Some(kind.upgrade_cost(self.level(kind)))
        }
    }

    /// Raise a building by one level. Returns `false` at max level.
    pub fn upgrade(&mut self, kind: BuildingKind) -> bool {
        if self.is_maxed(kind) {
            return false;
        }
        match kind {
            BuildingKind::Storage => self.storage_level += 1,
            BuildingKind::Barracks => self.barracks_level += 1,
        }
        true
    }

    /// Ceiling on ammo and food.
    #[must_use]
    pub const fn supply_capacity(self) -> u32 {
        STORAGE_BASE + STORAGE_PER_LEVEL * self.storage_level as u32
    }

    /// Ceiling on money: twice the supply ceiling.
    #[must_use]
    pub const fn money_capacity(self) -> u32 {
        MONEY_CAPACITY_MULTIPLIER * self.supply_capacity()
    }

    /// Ceiling on units.
    #[must_use]
    pub const fn max_units(self) -> u32 {
        BARRACKS_BASE + BARRACKS_PER_LEVEL * self.barracks_level as u32
    }

    /// All four ceilings as a ledger, for clamping.
    #[must_use]
    pub const fn capacity(self) -> Resource {
        let supply = self.supply_capacity();
        Resource::new(self.money_capacity(), supply, supply, self.max_units())
    }

    /// Snapshot for status displays.
    #[must_use]
    pub fn stats(self) -> BaseStats {
        BaseStats {
            storage_level: self.storage_level,
            barracks_level: self.barracks_level,
            capacity: self.capacity(),
            max_units: self.max_units(),
            next_storage_cost: self.next_upgrade_cost(BuildingKind::Storage),
            next_barracks_cost: self.next_upgrade_cost(BuildingKind::Barracks),
        }
    }
}

/// Derived base figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Storage level.
    pub storage_level: u8,
    /// Barracks level.
    pub barracks_level: u8,
    /// Resource ceilings.
    pub capacity: Resource,
    /// Unit ceiling.
    pub max_units: u32,
    /// Cost of the next storage upgrade (`None` when maxed).
    pub next_storage_cost: Option<Resource>,
    /// Cost of the next barracks upgrade (`None` when maxed).
    pub next_barracks_cost: Option<Resource>,
}
