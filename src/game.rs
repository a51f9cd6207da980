//! Game layer for Shadowops.
//!
//! Implements the rules of the campaign:
//! - Resource ledger with per-field capacity ceilings
//! - Objectives on a 2D map and their garrisons
//! - Operation validation and deterministic resolution
//! - Map-wide consequences of every operation
//! - Home base upgrades, recruitment and supply purchases
//! - The [`GameManager`] command surface that ties these together

mod action;
mod base;
mod combat;
pub mod invariants;
mod manager;
mod map;
mod objective;
mod resources;
mod state;

pub use action::{ActionKind, MapEffect, Validation, ValidationReason, validate};
pub use base::{BaseStats, BuildingKind, MAX_LEVEL, MIN_LEVEL, PlayerBase};
pub use combat::{
    MAX_PROBABILITY, MIN_PROBABILITY, OperationAnalysis, OperationResult, Outcome, RiskTier,
    SUCCESS_THRESHOLD, analyze_operation, outcome_for, player_strength, resolve_operation,
    success_probability,
};
pub use invariants::{InvariantViolation, check_invariants};
pub use manager::{
    AMMO_PRICE, FOOD_PRICE, GameManager, RECRUIT_FOOD_PER_UNIT, RECRUIT_MONEY_PER_UNIT,
};
pub use map::{DEFAULT_LAYOUT, MapConsequence, MapStats, ObjectiveMap};
pub use objective::{Objective, ObjectiveId, ObjectiveKind, ObjectiveStatus, Position};
pub use resources::Resource;
pub use state::{GameState, GameStatus, MAX_ALERT, NewGameConfig, STARTING_RESOURCES, Statistics};
