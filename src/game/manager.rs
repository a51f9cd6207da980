//! Command surface over the game aggregate.
//!
//! [`GameManager`] is the only thing that mutates a [`GameState`]. Every
//! command either completes in full or returns a [`Rejection`] without
//! touching the state, so callers never observe a half-applied transition.

use tracing::{debug, info, warn};

use crate::error::Rejection;
use crate::game::invariants::{assert_invariants, check_invariants};
use crate::game::{
    ActionKind, BaseStats, BuildingKind, GameState, GameStatus, MapStats, NewGameConfig,
    Objective, ObjectiveId, OperationAnalysis, OperationResult, Position, Resource, Statistics,
    Validation, analyze_operation, resolve_operation, validate,
};

/// Money per recruited unit.
pub const RECRUIT_MONEY_PER_UNIT: u32 = 100;

/// Food per recruited unit.
pub const RECRUIT_FOOD_PER_UNIT: u32 = 5;

/// Money per unit of ammo purchased.
pub const AMMO_PRICE: u32 = 5;

/// Money per unit of food purchased.
pub const FOOD_PRICE: u32 = 2;

/// Owns the game aggregate and exposes its commands and queries.
#[derive(Debug, Clone)]
pub struct GameManager {
    state: GameState,
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new(NewGameConfig::default())
    }
}

impl GameManager {
    /// Start managing a fresh game.
    #[must_use]
    pub fn new(config: NewGameConfig) -> Self {
        Self {
            state: GameState::new(config),
        }
    }

    /// Manage a restored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::InvalidSnapshot`] if the snapshot breaks invariants.
    pub fn from_state(state: GameState) -> Result<Self, Rejection> {
        let mut manager = Self::default();
        manager.import_state(state)?;
        Ok(manager)
    }

    /// Discard the current game and start a new one.
    pub fn start_new_game(&mut self, config: NewGameConfig) {
        self.state = GameState::new(config);
        info!(id = %self.state.id, objectives = self.state.objectives.len(), "new game started");
        if self.state.status == GameStatus::Victory {
            info!("victory: no active objectives");
        }
    }

    /// Read-only view of the aggregate.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Current ledger.
    #[must_use]
    pub const fn resources(&self) -> Resource {
        self.state.resources
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.state.status
    }

    /// Current alert level.
    #[must_use]
    pub const fn alert_level(&self) -> f64 {
        self.state.alert_level
    }

    /// Cumulative statistics.
    #[must_use]
    pub const fn statistics(&self) -> &Statistics {
        &self.state.statistics
    }

    /// Every resolved operation, oldest first.
    #[must_use]
    pub fn history(&self) -> &[OperationResult] {
        &self.state.history
    }

    /// All objectives in list order.
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        self.state.objectives.as_slice()
    }

    /// Look up an objective by id.
    #[must_use]
    pub fn objective(&self, id: ObjectiveId) -> Option<&Objective> {
        self.state.objectives.get(id)
    }

    /// Closest objective to a position within `tolerance`.
    #[must_use]
    pub fn nearest_objective(&self, position: Position, tolerance: f64) -> Option<&Objective> {
        self.state.objectives.nearest(position, tolerance)
    }

    /// Objective counts.
    #[must_use]
    pub fn map_stats(&self) -> MapStats {
        self.state.objectives.stats()
    }

    /// Base levels, ceilings and upgrade costs.
    #[must_use]
    pub fn base_stats(&self) -> BaseStats {
        self.state.base.stats()
    }

    /// Preview the precondition checks for an operation.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownObjective`] if the objective does not exist.
    pub fn validate_operation(
        &self,
        action: ActionKind,
        objective: ObjectiveId,
    ) -> Result<Validation, Rejection> {
        let target = self.target(objective)?;
        Ok(validate(action, &self.state.resources, target))
    }

    /// Preview odds, expected loss/gain and risk for an operation.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownObjective`] if the objective does not exist.
    pub fn analyze_operation(
        &self,
        action: ActionKind,
        objective: ObjectiveId,
    ) -> Result<OperationAnalysis, Rejection> {
        let target = self.target(objective)?;
        Ok(analyze_operation(action, &self.state.resources, target))
    }

    /// Execute one operation against one objective.
    ///
    /// Validates, resolves, pays the cost, collects the reward (clamped to
    /// capacity), raises the alert level, applies the objective effect and
    /// the map-wide consequence, records statistics and finally checks for
    /// victory.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the game is not in progress, the objective
    /// is unknown, or the operation fails validation. The state is unchanged.
    pub fn execute_operation(
        &mut self,
        action: ActionKind,
        objective: ObjectiveId,
    ) -> Result<OperationResult, Rejection> {
        self.ensure_playing()?;
        let target = self.target(objective)?;

        let validation = validate(action, &self.state.resources, target);
        if !validation.is_valid() {
            warn!(%action, objective, reasons = ?validation.reasons, "operation rejected");
            return Err(Rejection::Invalid(validation));
        }

        let result = resolve_operation(action, &self.state.resources, target);
        let success = result.outcome.is_success();
        debug!(
            %action,
            objective,
            probability = result.probability,
            outcome = %result.outcome,
            "operation resolved"
        );

        self.state.debit(result.resources_lost);
        if success {
            self.state.credit(result.resources_gained);
        }

        if self.state.raise_alert(action.alert_for(success)) {
            info!(alert = self.state.alert_level, "alert maxed out, game lost");
        }

        if success {
            match action {
                ActionKind::Capture => {
                    self.state.objectives.capture(objective);
                }
                ActionKind::Destruction => {
                    self.state.objectives.destroy(objective);
                }
                ActionKind::Raid | ActionKind::Robbery => {}
            }
        }

        self.state.objectives.apply_consequence(action, success);

        self.state.statistics.record(&result);
        self.state.history.push(result.clone());

        if self.state.check_victory() {
            info!(operations = self.state.statistics.operations, "all objectives resolved, game won");
        }

        assert_invariants(&self.state);
        Ok(result)
    }

    /// Upgrade a building by one level. Returns the new level.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the game is not in progress, the building is
    /// maxed, or the upgrade is unaffordable.
    pub fn upgrade_building(&mut self, kind: BuildingKind) -> Result<u8, Rejection> {
        self.ensure_playing()?;

        let Some(cost) = self.state.base.next_upgrade_cost(kind) else {
            warn!(building = %kind, "upgrade rejected: max level");
            return Err(Rejection::MaxLevel(kind));
        };
        self.ensure_affordable(cost)?;

        self.state.debit(cost);
        self.state.base.upgrade(kind);

        let level = self.state.base.level(kind);
        info!(building = %kind, level, "building upgraded");
        assert_invariants(&self.state);
        Ok(level)
    }

    /// Recruit `count` units. Returns the amount paid.
    ///
    /// Costs 100 money and 5 food per unit.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the game is not in progress, `count` is zero,
    /// the unit ceiling would be exceeded, or the cost is unaffordable.
    pub fn recruit_units(&mut self, count: u32) -> Result<Resource, Rejection> {
        self.ensure_playing()?;
        if count == 0 {
            return Err(Rejection::ZeroQuantity);
        }

        let gained = Resource::new(0, 0, 0, count);
        self.ensure_capacity(gained)?;

        let cost = Resource::new(
            count.saturating_mul(RECRUIT_MONEY_PER_UNIT),
            0,
            count.saturating_mul(RECRUIT_FOOD_PER_UNIT),
            0,
        );
        self.ensure_affordable(cost)?;

        self.state.debit(cost);
        self.state.credit(gained);

        info!(count, units = self.state.resources.units, "units recruited");
        assert_invariants(&self.state);
        Ok(cost)
    }

    /// Buy ammo and food for money. Returns the amount paid.
    ///
    /// Ammo costs 5 money per unit, food 2.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the game is not in progress, nothing is
    /// requested, a ceiling would be exceeded, or the money is insufficient.
    pub fn purchase_supplies(&mut self, ammo: u32, food: u32) -> Result<Resource, Rejection> {
        self.ensure_playing()?;
        if ammo == 0 && food == 0 {
            return Err(Rejection::ZeroQuantity);
        }

        let gained = Resource::new(0, ammo, food, 0);
        self.ensure_capacity(gained)?;

        let price = ammo
            .saturating_mul(AMMO_PRICE)
            .saturating_add(food.saturating_mul(FOOD_PRICE));
        let cost = Resource::new(price, 0, 0, 0);
        self.ensure_affordable(cost)?;

        self.state.debit(cost);
        self.state.credit(gained);

        info!(ammo, food, price, "supplies purchased");
        assert_invariants(&self.state);
        Ok(cost)
    }

    /// Pause a game in progress. Returns `false` (no-op) from any other status.
    pub fn pause_game(&mut self) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }
        self.state.status = GameStatus::Paused;
        info!("game paused");
        true
    }

    /// Resume a paused game. Returns `false` (no-op) from any other status.
    ///
    /// A resumed game with no active objectives goes straight to victory.
    pub fn resume_game(&mut self) -> bool {
        if self.state.status != GameStatus::Paused {
            return false;
        }
        self.state.status = GameStatus::Playing;
        info!("game resumed");
        if self.state.check_victory() {
            info!("victory: no active objectives");
        }
        true
    }

    /// Snapshot the aggregate for persistence, stamping the save time.
    ///
    /// The timestamp is supplied by the caller so the engine stays clock-free.
    pub fn export_state(&mut self, timestamp: u64) -> GameState {
        self.state.last_save_timestamp = timestamp;
        self.state.clone()
    }

    /// Replace the aggregate with a snapshot.
    ///
    /// Pending status transitions are evaluated first: a snapshot at full
    /// alert becomes a defeat, a playing snapshot with nothing left to take
    /// becomes a victory.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::InvalidSnapshot`] if the snapshot still breaks
    /// invariants after evaluation. The current state is kept in that case.
    pub fn import_state(&mut self, mut state: GameState) -> Result<(), Rejection> {
        state.check_defeat();
        state.check_victory();

        let violations = check_invariants(&state);
        if !violations.is_empty() {
            let messages: Vec<String> = violations.into_iter().map(|v| v.message).collect();
            warn!(count = messages.len(), "snapshot rejected");
            return Err(Rejection::InvalidSnapshot(messages));
        }

        info!(id = %state.id, status = %state.status, "game state imported");
        self.state = state;
        Ok(())
    }

    fn ensure_playing(&self) -> Result<(), Rejection> {
        if self.state.is_playing() {
            Ok(())
        } else {
            warn!(status = %self.state.status, "command rejected: game not in progress");
            Err(Rejection::NotPlaying(self.state.status))
        }
    }

    fn target(&self, objective: ObjectiveId) -> Result<&Objective, Rejection> {
        self.state
            .objectives
            .get(objective)
            .ok_or(Rejection::UnknownObjective(objective))
    }

    fn ensure_affordable(&self, cost: Resource) -> Result<(), Rejection> {
        if self.state.resources.can_afford(&cost) {
            Ok(())
        } else {
            warn!(%cost, available = %self.state.resources, "command rejected: unaffordable");
            Err(Rejection::InsufficientResources {
                required: cost,
                available: self.state.resources,
            })
        }
    }

    fn ensure_capacity(&self, gained: Resource) -> Result<(), Rejection> {
        let requested = self.state.resources + gained;
        let capacity = self.state.base.capacity();
        if requested.fits_within(&capacity) {
            Ok(())
        } else {
            warn!(%requested, %capacity, "command rejected: over capacity");
            Err(Rejection::CapacityExceeded {
                requested,
                capacity,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ObjectiveKind, ObjectiveMap, ObjectiveStatus, Outcome};

    fn single_village() -> GameManager {
        GameManager::new(NewGameConfig {
            objectives: Some(ObjectiveMap::new(vec![Objective::spawn(
                1,
                ObjectiveKind::Village,
                Position::new(0.0, 0.0),
            )])),
            ..NewGameConfig::default()
        })
    }

    #[test]
    fn test_raid_scenario() {
        let mut manager = GameManager::default();
        let result = manager.execute_operation(ActionKind::Raid, 1).unwrap();

        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(manager.resources(), Resource::new(500, 23, 34, 10));
        assert!((manager.alert_level() - 0.10).abs() < 1e-12);
        // Raids never change the target's status.
        assert_eq!(manager.objective(1).map(|o| o.status), Some(ObjectiveStatus::Active));
        assert_eq!(manager.statistics().operations, 1);
        assert_eq!(manager.history().len(), 1);
    }

    #[test]
    fn test_unknown_objective() {
        let mut manager = GameManager::default();
        let before = manager.state().clone();
        assert_eq!(
            manager.execute_operation(ActionKind::Raid, 404),
            Err(Rejection::UnknownObjective(404))
        );
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn test_invalid_operation_leaves_state_untouched() {
        let mut manager = GameManager::default();
        // Capture needs 5 units and 10 ammo; drain ammo first.
        manager.state.resources.ammo = 3;
        let before = manager.state().clone();
        let err = manager.execute_operation(ActionKind::Capture, 1).unwrap_err();
        assert!(matches!(err, Rejection::Invalid(_)));
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn test_capture_last_objective_wins() {
        let mut manager = single_village();
        let result = manager.execute_operation(ActionKind::Capture, 1).unwrap();
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(manager.status(), GameStatus::Victory);
        assert_eq!(manager.statistics().captures, 1);

        // Nothing changes after the game is over.
        let before = manager.state().clone();
        assert_eq!(
            manager.recruit_units(1),
            Err(Rejection::NotPlaying(GameStatus::Victory))
        );
        assert!(!manager.pause_game());
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn test_pause_resume_only_from_matching_state() {
        let mut manager = GameManager::default();
        assert!(!manager.resume_game());
        assert!(manager.pause_game());
        assert!(!manager.pause_game());
        assert_eq!(
            manager.execute_operation(ActionKind::Raid, 1),
            Err(Rejection::NotPlaying(GameStatus::Paused))
        );
        assert!(manager.resume_game());
        assert_eq!(manager.status(), GameStatus::Playing);
    }

    #[test]
    fn test_upgrade_storage() {
        let mut manager = GameManager::default();
        assert_eq!(manager.upgrade_building(BuildingKind::Storage), Ok(2));
        assert_eq!(manager.resources(), Resource::new(200, 18, 27, 5));
        assert_eq!(manager.base_stats().capacity.money, 1400);
    }

    #[test]
    fn test_upgrade_unaffordable() {
        let mut manager = GameManager::default();
        manager.state.resources.money = 299;
        let before = manager.state().clone();
        assert!(matches!(
            manager.upgrade_building(BuildingKind::Barracks),
            Err(Rejection::InsufficientResources { .. })
        ));
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn test_upgrade_maxed() {
        let mut manager = GameManager::default();
        manager.state.base.barracks_level = crate::game::MAX_LEVEL;
        assert_eq!(
            manager.upgrade_building(BuildingKind::Barracks),
            Err(Rejection::MaxLevel(BuildingKind::Barracks))
        );
    }

    #[test]
    fn test_recruit() {
        let mut manager = GameManager::default();
        assert_eq!(manager.recruit_units(3), Ok(Resource::new(300, 0, 15, 0)));
        assert_eq!(manager.resources(), Resource::new(200, 20, 15, 8));
    }

    #[test]
    fn test_recruit_over_ceiling() {
        let mut manager = GameManager::default();
        // Ceiling is 15 at barracks level 1; we hold 5.
        assert!(matches!(
            manager.recruit_units(11),
            Err(Rejection::CapacityExceeded { .. })
        ));
        assert_eq!(manager.recruit_units(0), Err(Rejection::ZeroQuantity));
    }

    #[test]
    fn test_purchase_supplies() {
        let mut manager = GameManager::default();
        assert_eq!(manager.purchase_supplies(10, 20), Ok(Resource::new(90, 0, 0, 0)));
        assert_eq!(manager.resources(), Resource::new(410, 30, 50, 5));
        assert!(matches!(
            manager.purchase_supplies(0, 600),
            Err(Rejection::CapacityExceeded { .. })
        ));
        assert!(matches!(
            manager.purchase_supplies(200, 0),
            Err(Rejection::InsufficientResources { .. })
        ));
    }

    #[test]
    fn test_previews_do_not_mutate() {
        let manager = GameManager::default();
        let before = manager.state().clone();
        assert!(manager.validate_operation(ActionKind::Raid, 1).unwrap().is_valid());
        let analysis = manager.analyze_operation(ActionKind::Raid, 1).unwrap();
        assert_eq!(analysis.predicted_outcome, Outcome::Success);
        assert_eq!(manager.state(), &before);
        assert!(manager.analyze_operation(ActionKind::Raid, 99).is_err());
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut manager = GameManager::default();
        manager.execute_operation(ActionKind::Raid, 1).unwrap();
        let snapshot = manager.export_state(1_700_000_000);
        assert_eq!(snapshot.last_save_timestamp, 1_700_000_000);

        let restored = GameManager::from_state(snapshot.clone()).unwrap();
        assert_eq!(restored.state(), &snapshot);
    }

    #[test]
    fn test_import_full_alert_is_defeat() {
        let mut snapshot = GameManager::default().state().clone();
        snapshot.alert_level = 1.0;
        let manager = GameManager::from_state(snapshot).unwrap();
        assert_eq!(manager.status(), GameStatus::Defeat);
    }

    #[test]
    fn test_import_rejects_out_of_range_alert() {
        let mut manager = GameManager::default();
        let mut snapshot = manager.state().clone();
        snapshot.alert_level = -0.5;
        let before = manager.state().clone();
        assert!(matches!(
            manager.import_state(snapshot),
            Err(Rejection::InvalidSnapshot(_))
        ));
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn test_maxed_counters_keep_resolving() {
        let mut snapshot = GameManager::default().state().clone();
        snapshot.statistics.operations = u32::MAX;
        snapshot.statistics.successes = u32::MAX;
        let mut manager = GameManager::from_state(snapshot).unwrap();

        let result = manager.execute_operation(ActionKind::Raid, 1).unwrap();
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(manager.statistics().operations, u32::MAX);
        assert_eq!(manager.statistics().successes, u32::MAX);
        assert!(check_invariants(manager.state()).is_empty());
    }

    #[test]
    fn test_start_new_game_on_resolved_layout_is_victory() {
        let mut manager = GameManager::default();
        manager.start_new_game(NewGameConfig {
            objectives: Some(ObjectiveMap::new(Vec::new())),
            ..NewGameConfig::default()
        });
        assert_eq!(manager.status(), GameStatus::Victory);
        assert!(matches!(
            manager.recruit_units(1),
            Err(Rejection::NotPlaying(GameStatus::Victory))
        ));
    }

    #[test]
    fn test_resume_with_nothing_left_is_victory() {
        let mut manager = single_village();
        assert!(manager.pause_game());
        let mut snapshot = manager.export_state(0);
        assert!(snapshot.objectives.capture(1));

        manager.import_state(snapshot).unwrap();
        assert_eq!(manager.status(), GameStatus::Paused);
        assert!(manager.resume_game());
        assert_eq!(manager.status(), GameStatus::Victory);
    }
}
