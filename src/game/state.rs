//! The persisted game aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{
    ActionKind, ObjectiveMap, OperationResult, Outcome, PlayerBase, Resource,
};

/// Ledger a new game starts with.
pub const STARTING_RESOURCES: Resource = Resource::new(500, 20, 30, 5);

/// Alert level at which the game is lost.
pub const MAX_ALERT: f64 = 1.0;

/// Top-level game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Commands are accepted.
    Playing,
    /// Every objective was captured or destroyed.
    Victory,
    /// The alert level reached its maximum.
    Defeat,
    /// Temporarily suspended; only resume is accepted.
    Paused,
}

impl GameStatus {
    /// Whether the game has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Victory | GameStatus::Defeat)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::Playing => "playing",
            GameStatus::Victory => "victory",
            GameStatus::Defeat => "defeat",
            GameStatus::Paused => "paused",
        })
    }
}

/// Cumulative operation statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Operations resolved.
    pub operations: u32,
    /// Successful operations.
    pub successes: u32,
    /// Failed operations.
    pub failures: u32,
    /// Objectives captured.
    pub captures: u32,
    /// Objectives destroyed.
    pub destructions: u32,
    /// Sum of resources lost to operations.
    pub total_lost: Resource,
    /// Sum of resources gained from operations, before capacity clamping.
    pub total_gained: Resource,
}

impl Statistics {
    /// Fold one resolved operation into the totals. Counters saturate.
    pub fn record(&mut self, result: &OperationResult) {
        self.operations = self.operations.saturating_add(1);
        match result.outcome {
            Outcome::Success => {
                self.successes = self.successes.saturating_add(1);
                match result.action {
                    ActionKind::Capture => self.captures = self.captures.saturating_add(1),
                    ActionKind::Destruction => {
                        self.destructions = self.destructions.saturating_add(1);
                    }
                    ActionKind::Raid | ActionKind::Robbery => {}
                }
            }
            Outcome::Failure => self.failures = self.failures.saturating_add(1),
        }
        self.total_lost += result.resources_lost;
        self.total_gained += result.resources_gained;
    }

    /// Fraction of operations that succeeded, or zero before any operation.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.operations == 0 {
            0.0
        } else {
            f64::from(self.successes) / f64::from(self.operations)
        }
    }
}

/// Parameters for starting a new game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewGameConfig {
    /// Identity of the new game.
    pub id: String,
    /// Starting ledger.
    pub resources: Resource,
    /// Objective layout. The fixed default layout when `None`.
    pub objectives: Option<ObjectiveMap>,
}

impl Default for NewGameConfig {
    fn default() -> Self {
        Self {
            id: "game".to_string(),
            resources: STARTING_RESOURCES,
            objectives: None,
        }
    }
}

/// Complete game state. This is the unit of persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Identity of this game.
    pub id: String,
    /// Resource ledger.
    pub resources: Resource,
    /// Detection meter in `[0, 1]`.
    pub alert_level: f64,
    /// Map objectives.
    pub objectives: ObjectiveMap,
    /// Top-level status.
    pub status: GameStatus,
    /// Cumulative statistics.
    pub statistics: Statistics,
    /// Home base buildings.
    #[serde(default)]
    pub base: PlayerBase,
    /// Resolved operations in order.
    #[serde(default)]
    pub history: Vec<OperationResult>,
    /// When the state was last exported, in caller-defined units.
    #[serde(default)]
    pub last_save_timestamp: u64,
}

impl GameState {
    /// Create a fresh game from a config.
    ///
    /// A layout with nothing left to take starts as a victory.
    #[must_use]
    pub fn new(config: NewGameConfig) -> Self {
        let base = PlayerBase::default();
        let mut state = Self {
            id: config.id,
            resources: config.resources.clamp_to(&base.capacity()),
            alert_level: 0.0,
            objectives: config
                .objectives
                .unwrap_or_else(ObjectiveMap::default_layout),
            status: GameStatus::Playing,
            statistics: Statistics::default(),
            base,
            history: Vec::new(),
            last_save_timestamp: 0,
        };
        state.check_victory();
        state
    }

    /// Whether gameplay commands are currently accepted.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Raise the alert level, capped at [`MAX_ALERT`].
    ///
    /// Returns `true` if this raise pushed the game into defeat.
    pub(crate) fn raise_alert(&mut self, amount: f64) -> bool {
        self.alert_level = (self.alert_level + amount.max(0.0)).min(MAX_ALERT);
        self.check_defeat()
    }

    /// Enter defeat if the alert level is at its maximum.
    ///
    /// Returns `true` on the transition, `false` if already over or still safe.
    pub(crate) fn check_defeat(&mut self) -> bool {
        if self.alert_level >= MAX_ALERT && !self.status.is_over() {
            self.status = GameStatus::Defeat;
            return true;
        }
        false
    }

    /// Enter victory if playing and no objective is active.
    ///
    /// Returns `true` on the transition.
    pub(crate) fn check_victory(&mut self) -> bool {
        if self.is_playing() && self.objectives.all_resolved() {
            self.status = GameStatus::Victory;
            return true;
        }
        false
    }

    /// Add to the ledger, then clamp every field to the base's ceilings.
    pub(crate) fn credit(&mut self, amount: Resource) {
        self.resources = (self.resources + amount).clamp_to(&self.base.capacity());
    }

    /// Subtract from the ledger, flooring each field at zero.
    pub(crate) fn debit(&mut self, amount: Resource) {
        self.resources -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Objective, ObjectiveKind, Position};

    #[test]
    fn test_new_game_defaults() {
        let state = GameState::new(NewGameConfig::default());
        assert_eq!(state.resources, STARTING_RESOURCES);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.objectives.len(), 8);
        assert!(state.alert_level.abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_game_clamps_starting_ledger() {
        let state = GameState::new(NewGameConfig {
            resources: Resource::new(99_999, 99_999, 0, 99),
            ..NewGameConfig::default()
        });
        assert_eq!(state.resources, Resource::new(1200, 600, 0, 15));
    }

    #[test]
    fn test_alert_caps_and_defeats() {
        let mut state = GameState::new(NewGameConfig::default());
        assert!(!state.raise_alert(0.5));
        assert!(state.raise_alert(0.75));
        assert!((state.alert_level - MAX_ALERT).abs() < f64::EPSILON);
        assert_eq!(state.status, GameStatus::Defeat);
        // Already over: no second transition.
        assert!(!state.raise_alert(0.1));
    }

    #[test]
    fn test_empty_map_is_victory() {
        let mut state = GameState::new(NewGameConfig::default());
        state.objectives = ObjectiveMap::default();
        assert!(state.check_victory());
        assert_eq!(state.status, GameStatus::Victory);
    }

    #[test]
    fn test_resolved_layout_starts_as_victory() {
        let mut farm = Objective::spawn(1, ObjectiveKind::Farm, Position::default());
        assert!(farm.capture());
        let state = GameState::new(NewGameConfig {
            objectives: Some(ObjectiveMap::new(vec![farm])),
            ..NewGameConfig::default()
        });
        assert_eq!(state.status, GameStatus::Victory);

        let fresh = GameState::new(NewGameConfig::default());
        assert_eq!(fresh.status, GameStatus::Playing);
    }

    #[test]
    fn test_statistics_saturate() {
        let target = Objective::spawn(1, ObjectiveKind::Village, Position::default());
        let result = crate::game::resolve_operation(
            ActionKind::Capture,
            &Resource::new(500, 200, 200, 20),
            &target,
        );
        let mut stats = Statistics {
            operations: u32::MAX,
            successes: u32::MAX,
            captures: u32::MAX,
            ..Statistics::default()
        };
        stats.record(&result);
        assert_eq!(stats.operations, u32::MAX);
        assert_eq!(stats.successes, u32::MAX);
        assert_eq!(stats.captures, u32::MAX);
    }

    #[test]
    fn test_no_victory_while_paused() {
        let mut state = GameState::new(NewGameConfig {
            objectives: Some(ObjectiveMap::new(vec![])),
            ..NewGameConfig::default()
        });
        state.status = GameStatus::Paused;
        assert!(!state.check_victory());
    }

    #[test]
    fn test_credit_clamps_debit_floors() {
        let mut state = GameState::new(NewGameConfig::default());
        state.credit(Resource::new(5000, 5000, 5000, 5000));
        assert_eq!(state.resources, state.base.capacity());
        state.debit(Resource::new(99_999, 0, 0, 99_999));
        assert_eq!(state.resources.money, 0);
        assert_eq!(state.resources.units, 0);
    }

    #[test]
    fn test_statistics_record() {
        let target = Objective::spawn(1, ObjectiveKind::Village, Position::default());
        let result = crate::game::resolve_operation(
            ActionKind::Capture,
            &Resource::new(500, 200, 200, 20),
            &target,
        );
        let mut stats = Statistics::default();
        stats.record(&result);
        assert_eq!(stats.operations, 1);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.captures, 1);
        assert!((stats.success_rate() - 1.0).abs() < f64::EPSILON);
    }
}
