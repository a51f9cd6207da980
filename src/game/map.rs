//! Objective collection and map-wide consequences.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::{
    ActionKind, MapEffect, Objective, ObjectiveId, ObjectiveKind, ObjectiveStatus, Position,
};

/// Starting layout: archetype and position for each objective, in id order.
pub const DEFAULT_LAYOUT: [(ObjectiveKind, f64, f64); 8] = [
    (ObjectiveKind::Village, 120.0, 180.0),
    (ObjectiveKind::Farm, 260.0, 90.0),
    (ObjectiveKind::Village, 410.0, 240.0),
    (ObjectiveKind::Warehouse, 180.0, 420.0),
    (ObjectiveKind::Farm, 540.0, 130.0),
    (ObjectiveKind::Outpost, 620.0, 380.0),
    (ObjectiveKind::Warehouse, 360.0, 560.0),
    (ObjectiveKind::Fortress, 720.0, 620.0),
];

/// What a resolved operation did to the rest of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapConsequence {
    /// Every active objective gained `points` of defense bonus.
    DefenseRaised {
        /// Bonus points added per objective.
        points: u32,
        /// Number of objectives affected.
        affected: u32,
    },
    /// Every active objective lost up to `units` garrison units.
    ForcesReduced {
        /// Units removed per objective, before flooring at zero.
        units: u32,
        /// Number of objectives affected.
        affected: u32,
    },
}

/// Aggregate counts over the objective list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapStats {
    /// Number of objectives on the map.
    pub total: u32,
    /// Objectives still active.
    pub active: u32,
    /// Objectives captured.
    pub captured: u32,
    /// Objectives destroyed.
    pub destroyed: u32,
    /// Sum of total strength across active objectives.
    pub total_active_strength: u64,
}

/// Owned objective list with an id index.
///
/// Objectives keep their insertion order, which is also the tie-break order
/// for [`ObjectiveMap::nearest`]. Serializes as a plain list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Objective>", into = "Vec<Objective>")]
pub struct ObjectiveMap {
    objectives: Vec<Objective>,
    index: HashMap<ObjectiveId, usize>,
}

impl From<Vec<Objective>> for ObjectiveMap {
    fn from(objectives: Vec<Objective>) -> Self {
        Self::new(objectives)
    }
}

impl From<ObjectiveMap> for Vec<Objective> {
    fn from(map: ObjectiveMap) -> Self {
        map.objectives
    }
}

impl ObjectiveMap {
    /// Build a map from an objective list.
    ///
    /// If ids repeat, lookups resolve to the first occurrence.
    #[must_use]
    pub fn new(objectives: Vec<Objective>) -> Self {
        let mut index = HashMap::with_capacity(objectives.len());
        for (i, objective) in objectives.iter().enumerate() {
            index.entry(objective.id).or_insert(i);
        }
        Self { objectives, index }
    }

    /// The fixed new-game layout.
    #[must_use]
    pub fn default_layout() -> Self {
        let objectives = (1..)
            .zip(DEFAULT_LAYOUT)
            .map(|(id, (kind, x, y))| Objective::spawn(id, kind, Position::new(x, y)))
            .collect();
        Self::new(objectives)
    }

    /// Whether every objective id appears exactly once.
    #[must_use]
    pub fn has_unique_ids(&self) -> bool {
        self.index.len() == self.objectives.len()
    }

    /// Number of objectives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// Whether the map has no objectives at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// All objectives in list order.
    #[must_use]
    pub fn as_slice(&self) -> &[Objective] {
        &self.objectives
    }

    /// Iterate over all objectives in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter()
    }

    /// Iterate over objectives that can still be targeted.
    pub fn active(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter().filter(|o| o.is_active())
    }

    /// Whether every objective is captured or destroyed (vacuously true when empty).
    #[must_use]
    pub fn all_resolved(&self) -> bool {
        self.objectives.iter().all(|o| !o.is_active())
    }

    /// Look up an objective by id.
    #[must_use]
    pub fn get(&self, id: ObjectiveId) -> Option<&Objective> {
        self.index.get(&id).map(|&i| &self.objectives[i])
    }

    fn get_mut(&mut self, id: ObjectiveId) -> Option<&mut Objective> {
        self.index.get(&id).map(|&i| &mut self.objectives[i])
    }

    /// Closest objective to `position` within `tolerance`.
    ///
    /// Ties go to the objective that comes first in list order.
    #[must_use]
    pub fn nearest(&self, position: Position, tolerance: f64) -> Option<&Objective> {
        let mut best: Option<(&Objective, f64)> = None;
        for objective in &self.objectives {
            let distance = objective.position.distance_to(position);
            if distance > tolerance {
                continue;
            }
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((objective, distance)),
            }
        }
        best.map(|(objective, _)| objective)
    }

    /// Capture an objective. Returns `false` if unknown or already non-active.
    pub fn capture(&mut self, id: ObjectiveId) -> bool {
        self.get_mut(id).is_some_and(Objective::capture)
    }

    /// Destroy an objective. Returns `false` if unknown or already non-active.
    pub fn destroy(&mut self, id: ObjectiveId) -> bool {
        self.get_mut(id).is_some_and(Objective::destroy)
    }

    /// Apply the single map-wide consequence of a resolved operation.
    ///
    /// Non-destructive operations raise every active objective's defense
    /// bonus by `round(pct × 100)`, with `pct` halved on failure. A
    /// successful destruction instead removes `round(pct × 10)` units from
    /// every active garrison. A failed destruction goes through the bonus
    /// path with its zero bonus, so nothing changes.
    pub fn apply_consequence(&mut self, action: ActionKind, success: bool) -> MapConsequence {
        match (action.map_effect(), success) {
            (MapEffect::ForceReduction(pct), true) => {
                let units = round_points(pct * 10.0);
                let mut affected = 0;
                for objective in self.objectives.iter_mut().filter(|o| o.is_active()) {
                    objective.current_units = objective.current_units.saturating_sub(units);
                    affected += 1;
                }
                trace!(%action, units, affected, "enemy forces reduced");
                MapConsequence::ForcesReduced { units, affected }
            }
            _ => {
                let pct = if success {
                    action.defense_bonus_percent()
                } else {
                    action.defense_bonus_percent() / 2.0
                };
                let points = round_points(pct * 100.0);
                let mut affected = 0;
                for objective in self.objectives.iter_mut().filter(|o| o.is_active()) {
                    objective.defense_bonus = objective.defense_bonus.saturating_add(points);
                    affected += 1;
                }
                trace!(%action, points, affected, "enemy defenses raised");
                MapConsequence::DefenseRaised { points, affected }
            }
        }
    }

    /// Aggregate counts for status displays.
    #[must_use]
    pub fn stats(&self) -> MapStats {
        let mut stats = MapStats {
            total: u32::try_from(self.objectives.len()).unwrap_or(u32::MAX),
            ..MapStats::default()
        };
        for objective in &self.objectives {
            match objective.status {
                ObjectiveStatus::Active => {
                    stats.active += 1;
                    stats.total_active_strength += u64::from(objective.total_strength());
                }
                ObjectiveStatus::Captured => stats.captured += 1,
                ObjectiveStatus::Destroyed => stats.destroyed += 1,
            }
        }
        stats
    }
}

/// Round a non-negative fraction-derived amount half away from zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_points(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
