//! Operation catalog and precondition checks.
//!
//! Every operation is a closed variant with constant lookup tables. There is
//! no per-target tuning: the same raid costs the same against a farm or a
//! fortress, only the odds differ.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{Objective, ObjectiveStatus, Resource};

/// Failure alert increase as a multiple of the success increase.
const FAILURE_ALERT_MULTIPLIER: f64 = 1.5;

/// The four fixed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Quick strike for supplies and recruits.
    Raid,
    /// Covert theft of funds.
    Robbery,
    /// Take the objective over.
    Capture,
    /// Raze the objective.
    Destruction,
}

/// The map-wide consequence an operation carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEffect {
    /// Non-destructive pressure: raises defense of every active objective.
    ///
    /// The value is a fraction; it is applied as `round(value × 100)` points.
    DefenseBonus(f64),
    /// Destructive success: thins out every active garrison.
    ///
    /// The value is a fraction; it is applied as `round(value × 10)` units.
    ForceReduction(f64),
}

impl ActionKind {
    /// All operations in catalog order.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Raid,
        ActionKind::Robbery,
        ActionKind::Capture,
        ActionKind::Destruction,
    ];

    /// Multiplier applied to the raw strength ratio.
    #[must_use]
    pub fn success_coefficient(self) -> f64 {
        match self {
            ActionKind::Raid => 1.5,
            ActionKind::Robbery => 1.2,
            ActionKind::Capture => 0.9,
            ActionKind::Destruction => 1.0,
        }
    }

    /// Cost consumed whatever the outcome.
    #[must_use]
    pub const fn base_cost(self) -> Resource {
        match self {
            ActionKind::Raid => Resource::new(0, 2, 1, 0),
            ActionKind::Robbery => Resource::new(0, 3, 2, 0),
            ActionKind::Capture => Resource::new(0, 10, 5, 0),
            ActionKind::Destruction => Resource::new(50, 15, 5, 0),
        }
    }

    /// Units the player must field to attempt the operation.
    #[must_use]
    pub const fn min_units(self) -> u32 {
        match self {
            ActionKind::Raid => 1,
            ActionKind::Robbery => 2,
            ActionKind::Capture => 5,
            ActionKind::Destruction => 3,
        }
    }

    /// Alert increase on success.
    #[must_use]
    pub fn alert_increase(self) -> f64 {
        match self {
            ActionKind::Raid => 0.10,
            ActionKind::Robbery => 0.15,
            ActionKind::Capture => 0.20,
            ActionKind::Destruction => 0.25,
        }
    }

    /// Alert increase on failure: 1.5× the success increase.
    #[must_use]
    pub fn failure_alert_increase(self) -> f64 {
        self.alert_increase() * FAILURE_ALERT_MULTIPLIER
    }

    /// Alert increase for the given outcome.
    #[must_use]
    pub fn alert_for(self, success: bool) -> f64 {
        if success {
            self.alert_increase()
        } else {
            self.failure_alert_increase()
        }
    }

    /// Flat payout on success.
    #[must_use]
    pub const fn reward(self) -> Resource {
        match self {
            ActionKind::Raid => Resource::new(0, 5, 5, 5),
            ActionKind::Robbery => Resource::new(200, 0, 0, 0),
            ActionKind::Capture => Resource::new(100, 10, 10, 2),
            ActionKind::Destruction => Resource::new(50, 0, 0, 0),
        }
    }

    /// Extra loss on failure, added to the base cost.
    #[must_use]
    pub const fn failure_penalty(self) -> Resource {
        match self {
            ActionKind::Raid => Resource::new(0, 0, 0, 1),
            ActionKind::Robbery => Resource::new(50, 0, 0, 1),
            ActionKind::Capture => Resource::new(0, 5, 0, 2),
            ActionKind::Destruction => Resource::new(0, 5, 0, 2),
        }
    }

    /// Map-wide consequence table entry.
    #[must_use]
    pub const fn map_effect(self) -> MapEffect {
        match self {
            ActionKind::Raid => MapEffect::DefenseBonus(0.05),
            ActionKind::Robbery => MapEffect::DefenseBonus(0.10),
            ActionKind::Capture => MapEffect::DefenseBonus(0.15),
            ActionKind::Destruction => MapEffect::ForceReduction(0.20),
        }
    }

    /// Defense bonus fraction on success. Zero for destructive operations.
    #[must_use]
    pub fn defense_bonus_percent(self) -> f64 {
        match self.map_effect() {
            MapEffect::DefenseBonus(pct) => pct,
            MapEffect::ForceReduction(_) => 0.0,
        }
    }

    /// Whether the operation razes its target on success.
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(self, ActionKind::Destruction)
    }

    /// Lowercase name used on the command line and in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Raid => "raid",
            ActionKind::Robbery => "robbery",
            ActionKind::Capture => "capture",
            ActionKind::Destruction => "destruction",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// Why an operation attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationReason {
    /// The target is captured or destroyed.
    TargetNotActive,
    /// The ledger cannot cover the base cost.
    InsufficientResources {
        /// Base cost of the operation.
        required: Resource,
        /// Current ledger.
        available: Resource,
    },
    /// Not enough units to field the operation.
    InsufficientUnits {
        /// Minimum units for the operation.
        required: u32,
        /// Units on hand.
        available: u32,
    },
    /// Capture against a target that is already captured.
    AlreadyCaptured,
    /// Destruction against a target that is already destroyed.
    AlreadyDestroyed,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::TargetNotActive => write!(f, "target is not active"),
            ValidationReason::InsufficientResources {
                required,
                available,
            } => write!(
                f,
                "insufficient resources: need {required}, have {available}"
            ),
            ValidationReason::InsufficientUnits {
                required,
                available,
            } => write!(f, "insufficient units: need {required}, have {available}"),
            ValidationReason::AlreadyCaptured => write!(f, "target is already captured"),
            ValidationReason::AlreadyDestroyed => write!(f, "target is already destroyed"),
        }
    }
}

/// Outcome of checking an operation's preconditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// Rejection reasons in check order. Empty means the attempt is valid.
    pub reasons: Vec<ValidationReason>,
}

impl Validation {
    /// Whether the attempt passed every check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }
}

/// Check whether `action` can be attempted against `target` with `resources`.
///
/// Reasons are reported in a fixed order: target status, affordability,
/// unit count, then the action-specific status checks.
#[must_use]
pub fn validate(action: ActionKind, resources: &Resource, target: &Objective) -> Validation {
    let mut reasons = Vec::new();

    if !target.is_active() {
        reasons.push(ValidationReason::TargetNotActive);
    }

    let cost = action.base_cost();
    if !resources.can_afford(&cost) {
        reasons.push(ValidationReason::InsufficientResources {
            required: cost,
            available: *resources,
        });
    }

    if resources.units < action.min_units() {
        reasons.push(ValidationReason::InsufficientUnits {
            required: action.min_units(),
            available: resources.units,
        });
    }

    match (action, target.status) {
        (ActionKind::Capture, ObjectiveStatus::Captured) => {
            reasons.push(ValidationReason::AlreadyCaptured);
        }
        (ActionKind::Destruction, ObjectiveStatus::Destroyed) => {
            reasons.push(ValidationReason::AlreadyDestroyed);
        }
        _ => {}
    }

    Validation { reasons }
}
