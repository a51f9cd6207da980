//! Map objectives (points of interest) and their status lifecycle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::Resource;

/// Unique identifier for an objective.
pub type ObjectiveId = u32;

/// A position on the operations map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The five fixed objective archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Lightly defended settlement.
    Village,
    /// Supply farm with few guards.
    Farm,
    /// Storage warehouse.
    Warehouse,
    /// Forward military outpost.
    Outpost,
    /// Heavily defended fortress.
    Fortress,
}

impl ObjectiveKind {
    /// All archetypes in catalog order.
    pub const ALL: [ObjectiveKind; 5] = [
        ObjectiveKind::Village,
        ObjectiveKind::Farm,
        ObjectiveKind::Warehouse,
        ObjectiveKind::Outpost,
        ObjectiveKind::Fortress,
    ];

    /// Defense an objective of this kind spawns with.
    #[must_use]
    pub const fn base_defense(self) -> u32 {
        match self {
            ObjectiveKind::Village => 20,
            ObjectiveKind::Farm => 15,
            ObjectiveKind::Warehouse => 30,
            ObjectiveKind::Outpost => 45,
            ObjectiveKind::Fortress => 70,
        }
    }

    /// Units an objective of this kind spawns with.
    #[must_use]
    pub const fn base_units(self) -> u32 {
        match self {
            ObjectiveKind::Village => 8,
            ObjectiveKind::Farm => 5,
            ObjectiveKind::Warehouse => 10,
            ObjectiveKind::Outpost => 15,
            ObjectiveKind::Fortress => 25,
        }
    }

    /// Per-archetype loot table carried by the catalog.
    ///
    /// Operation execution does not consult this table: successful operations
    /// pay out the flat per-action reward from
    /// [`ActionKind::reward`](crate::game::ActionKind::reward). The table is
    /// kept so both payout schemes stay visible until a product decision
    /// picks one.
    #[must_use]
    pub const fn reward(self) -> Resource {
        match self {
            ObjectiveKind::Village => Resource::new(100, 5, 20, 2),
            ObjectiveKind::Farm => Resource::new(50, 0, 40, 1),
            ObjectiveKind::Warehouse => Resource::new(150, 30, 10, 0),
            ObjectiveKind::Outpost => Resource::new(200, 40, 10, 3),
            ObjectiveKind::Fortress => Resource::new(400, 60, 30, 5),
        }
    }

    /// Marker footprint in map units. Presentation only.
    #[must_use]
    pub const fn footprint(self) -> f64 {
        match self {
            ObjectiveKind::Village => 40.0,
            ObjectiveKind::Farm => 36.0,
            ObjectiveKind::Warehouse => 44.0,
            ObjectiveKind::Outpost => 48.0,
            ObjectiveKind::Fortress => 60.0,
        }
    }

    /// Lowercase name used on the command line and in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ObjectiveKind::Village => "village",
            ObjectiveKind::Farm => "farm",
            ObjectiveKind::Warehouse => "warehouse",
            ObjectiveKind::Outpost => "outpost",
            ObjectiveKind::Fortress => "fortress",
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown objective kind: {s}"))
    }
}

/// Lifecycle status of an objective. `Captured` and `Destroyed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    /// Still held by the enemy and targetable.
    Active,
    /// Taken over by the player.
    Captured,
    /// Razed by the player.
    Destroyed,
}

impl fmt::Display for ObjectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectiveStatus::Active => "active",
            ObjectiveStatus::Captured => "captured",
            ObjectiveStatus::Destroyed => "destroyed",
        })
    }
}

/// A single point of interest on the map.
///
/// Not `Copy`: objectives are mutated in place through the map, so copies
/// are taken explicitly.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    /// Unique identifier.
    pub id: ObjectiveId,
    /// Archetype.
    pub kind: ObjectiveKind,
    /// Map position.
    pub position: Position,
    /// Lifecycle status.
    pub status: ObjectiveStatus,
    /// Current garrison defense, excluding the accumulated bonus.
    pub current_defense: u32,
    /// Current garrison units.
    pub current_units: u32,
    /// Defense accumulated from map-wide alerts.
    pub defense_bonus: u32,
}

impl Objective {
    /// Spawn a fresh, active objective with its archetype's baseline garrison.
    #[must_use]
    pub const fn spawn(id: ObjectiveId, kind: ObjectiveKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            status: ObjectiveStatus::Active,
            current_defense: kind.base_defense(),
            current_units: kind.base_units(),
            defense_bonus: 0,
        }
    }

    /// Whether the objective can still be targeted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ObjectiveStatus::Active
    }

    /// Defense including the accumulated bonus.
    #[must_use]
    pub const fn total_defense(&self) -> u32 {
        self.current_defense.saturating_add(self.defense_bonus)
    }

    /// Total defense plus garrison units.
    #[must_use]
    pub const fn total_strength(&self) -> u32 {
        self.total_defense().saturating_add(self.current_units)
    }

    /// Mark as captured. Returns `false` (and changes nothing) unless active.
    pub fn capture(&mut self) -> bool {
        self.transition(ObjectiveStatus::Captured)
    }

    /// Mark as destroyed. Returns `false` (and changes nothing) unless active.
    pub fn destroy(&mut self) -> bool {
        self.transition(ObjectiveStatus::Destroyed)
    }

    fn transition(&mut self, to: ObjectiveStatus) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = to;
        true
    }
}
