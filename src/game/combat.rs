//! Operation resolution.
//!
//! Resolution is a pure function of the action, the attacker's ledger and the
//! target. There is no random draw: an operation succeeds exactly when its
//! success probability reaches [`SUCCESS_THRESHOLD`].
//!
//! ```text
//! player = units + ammo × 0.5 + food × 0.2
//! enemy  = total_defense + current_units
//! p      = clamp(player / enemy × coefficient, 0.05, 0.95)   (1.0 if enemy == 0)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{ActionKind, Objective, Resource};

/// Strength contributed by each unit of ammo.
const AMMO_STRENGTH: f64 = 0.5;

/// Strength contributed by each unit of food.
const FOOD_STRENGTH: f64 = 0.2;

/// Lower clamp for the success probability.
pub const MIN_PROBABILITY: f64 = 0.05;

/// Upper clamp for the success probability.
pub const MAX_PROBABILITY: f64 = 0.95;

/// Operations at or above this probability succeed.
pub const SUCCESS_THRESHOLD: f64 = 0.5;

/// Outcome of a resolved operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The operation achieved its goal.
    Success,
    /// The operation was repelled.
    Failure,
}

impl Outcome {
    /// Whether this is [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        })
    }
}

/// Immutable record of one resolved operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// The operation performed.
    pub action: ActionKind,
    /// The target as it was before the operation.
    pub target: Objective,
    /// Success or failure.
    pub outcome: Outcome,
    /// Base cost, plus the failure penalty on failure.
    pub resources_lost: Resource,
    /// Flat action reward on success, zero on failure.
    pub resources_gained: Resource,
    /// Attacker strength.
    pub player_strength: f64,
    /// Target strength.
    pub enemy_strength: u32,
    /// Probability the outcome was decided on.
    pub probability: f64,
}

/// Attacker strength derived from a ledger.
#[must_use]
pub fn player_strength(resources: &Resource) -> f64 {
    f64::from(resources.units)
        + f64::from(resources.ammo) * AMMO_STRENGTH
        + f64::from(resources.food) * FOOD_STRENGTH
}

/// Success probability of `action` with strength `player` against `enemy`.
///
/// An undefended target (`enemy == 0`) is a certain success.
#[must_use]
pub fn success_probability(action: ActionKind, player: f64, enemy: u32) -> f64 {
    if enemy == 0 {
        return 1.0;
    }
    let ratio = player / f64::from(enemy) * action.success_coefficient();
    ratio.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Deterministic outcome for a probability.
#[must_use]
pub fn outcome_for(probability: f64) -> Outcome {
    if probability >= SUCCESS_THRESHOLD {
        Outcome::Success
    } else {
        Outcome::Failure
    }
}

/// Resolve one operation. Pure: no state is read or written besides the inputs.
///
/// Rewards come from the action's flat table, never from the target's
/// archetype loot table.
#[must_use]
pub fn resolve_operation(
    action: ActionKind,
    attacker: &Resource,
    target: &Objective,
) -> OperationResult {
    let player = player_strength(attacker);
    let enemy = target.total_strength();
    let probability = success_probability(action, player, enemy);
    let outcome = outcome_for(probability);

    let (resources_lost, resources_gained) = match outcome {
        Outcome::Success => (action.base_cost(), action.reward()),
        Outcome::Failure => (action.base_cost() + action.failure_penalty(), Resource::ZERO),
    };

    OperationResult {
        action,
        target: target.clone(),
        outcome,
        resources_lost,
        resources_gained,
        player_strength: player,
        enemy_strength: enemy,
        probability,
    }
}

/// Coarse risk label for previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Probability of at least 0.75.
    Low,
    /// Probability of at least 0.5.
    Medium,
    /// Probability of at least 0.25.
    High,
    /// Anything lower.
    Extreme,
}

impl RiskTier {
    /// Tier for a success probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.75 {
            RiskTier::Low
        } else if probability >= SUCCESS_THRESHOLD {
            RiskTier::Medium
        } else if probability >= 0.25 {
            RiskTier::High
        } else {
            RiskTier::Extreme
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Extreme => "extreme",
        })
    }
}

/// Probability-weighted preview of an operation. Never used for execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationAnalysis {
    /// The operation previewed.
    pub action: ActionKind,
    /// Success probability.
    pub probability: f64,
    /// Outcome the operation would have right now.
    pub predicted_outcome: Outcome,
    /// Base cost plus the failure penalty weighted by `1 - p`.
    pub expected_loss: Resource,
    /// Reward weighted by `p`.
    pub expected_gain: Resource,
    /// Risk label.
    pub risk: RiskTier,
    /// Attacker strength.
    pub player_strength: f64,
    /// Target strength.
    pub enemy_strength: u32,
}

/// Preview an operation with expected values. Weighted amounts truncate.
#[must_use]
pub fn analyze_operation(
    action: ActionKind,
    attacker: &Resource,
    target: &Objective,
) -> OperationAnalysis {
    let player = player_strength(attacker);
    let enemy = target.total_strength();
    let probability = success_probability(action, player, enemy);

    OperationAnalysis {
        action,
        probability,
        predicted_outcome: outcome_for(probability),
        expected_loss: action.base_cost() + action.failure_penalty().scale(1.0 - probability),
        expected_gain: action.reward().scale(probability),
        risk: RiskTier::from_probability(probability),
        player_strength: player,
        enemy_strength: enemy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ObjectiveKind, Position};

    fn village() -> Objective {
        Objective::spawn(1, ObjectiveKind::Village, Position::default())
    }

    #[test]
    fn test_raid_on_fresh_village() {
        let wallet = Resource::new(500, 20, 30, 5);
        let result = resolve_operation(ActionKind::Raid, &wallet, &village());

        assert_eq!(result.enemy_strength, 28);
        assert!((result.player_strength - 21.0).abs() < 1e-9);
        // 21 / 28 × 1.5 = 1.125, clamped.
        assert!((result.probability - MAX_PROBABILITY).abs() < f64::EPSILON);
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.resources_lost, Resource::new(0, 2, 1, 0));
        assert_eq!(result.resources_gained, Resource::new(0, 5, 5, 5));
    }

    #[test]
    fn test_failure_adds_penalty_and_no_reward() {
        let wallet = Resource::new(0, 10, 5, 5);
        let fortress = Objective::spawn(1, ObjectiveKind::Fortress, Position::default());
        let result = resolve_operation(ActionKind::Capture, &wallet, &fortress);

        assert_eq!(result.outcome, Outcome::Failure);
        assert_eq!(
            result.resources_lost,
            ActionKind::Capture.base_cost() + ActionKind::Capture.failure_penalty()
        );
        assert_eq!(result.resources_gained, Resource::ZERO);
    }

    #[test]
    fn test_zero_enemy_strength_is_certain() {
        let mut target = village();
        target.current_defense = 0;
        target.current_units = 0;
        let result = resolve_operation(ActionKind::Robbery, &Resource::ZERO, &target);
        assert!((result.probability - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.outcome, Outcome::Success);
    }

    #[test]
    fn test_probability_floor() {
        let fortress = Objective::spawn(1, ObjectiveKind::Fortress, Position::default());
        let p = success_probability(ActionKind::Capture, 0.0, fortress.total_strength());
        assert!((p - MIN_PROBABILITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_boundary_is_success() {
        assert_eq!(outcome_for(0.5), Outcome::Success);
        assert_eq!(outcome_for(0.499_999), Outcome::Failure);
        // Exact 0.5: player 10, enemy 20, coefficient 1.0.
        let p = success_probability(ActionKind::Destruction, 10.0, 20);
        assert!((p - 0.5).abs() < f64::EPSILON);
        assert_eq!(outcome_for(p), Outcome::Success);
    }

    #[test]
    fn test_reward_ignores_archetype_loot_table() {
        let wallet = Resource::new(500, 200, 200, 20);
        for kind in ObjectiveKind::ALL {
            let target = Objective::spawn(1, kind, Position::default());
            let result = resolve_operation(ActionKind::Raid, &wallet, &target);
            if result.outcome.is_success() {
                assert_eq!(result.resources_gained, ActionKind::Raid.reward());
                assert_ne!(result.resources_gained, kind.reward());
            }
        }
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let wallet = Resource::new(123, 45, 67, 8);
        let target = Objective::spawn(3, ObjectiveKind::Outpost, Position::new(1.0, 2.0));
        let a = resolve_operation(ActionKind::Capture, &wallet, &target);
        let b = resolve_operation(ActionKind::Capture, &wallet, &target);
        assert_eq!(a, b);
    }

    #[test]
    fn test_analysis_expected_values() {
        let wallet = Resource::new(500, 20, 30, 5);
        let analysis = analyze_operation(ActionKind::Raid, &wallet, &village());
        assert_eq!(analysis.risk, RiskTier::Low);
        assert_eq!(analysis.predicted_outcome, Outcome::Success);
        // Reward 0/5/5/5 × 0.95 truncates to 0/4/4/4.
        assert_eq!(analysis.expected_gain, Resource::new(0, 4, 4, 4));
        // Penalty of one unit × 0.05 truncates away.
        assert_eq!(analysis.expected_loss, ActionKind::Raid.base_cost());
    }

    #[test]
    fn test_risk_tiers() {
        assert_eq!(RiskTier::from_probability(0.95), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.5), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.3), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.05), RiskTier::Extreme);
    }
}
