//! Game invariants - sanity checks that detect bugs.
//!
//! Commands keep these true by construction. The manager asserts them after
//! every state-changing command in debug builds, and checks them before
//! accepting an imported snapshot.

use std::fmt;

use crate::game::{GameState, GameStatus, MAX_LEVEL, MIN_LEVEL};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Ledger within the base's ceilings
    let capacity = state.base.capacity();
    if !state.resources.fits_within(&capacity) {
        violations.push(InvariantViolation::new(format!(
            "resources {} exceed capacity {capacity}",
            state.resources
        )));
    }

    // Alert meter
    if !(0.0..=1.0).contains(&state.alert_level) {
        violations.push(InvariantViolation::new(format!(
            "alert level {} outside [0, 1]",
            state.alert_level
        )));
    }
    if state.alert_level >= 1.0 && state.status != GameStatus::Defeat {
        violations.push(InvariantViolation::new(format!(
            "alert level is maxed but status is {}",
            state.status
        )));
    }

    // Victory requires nothing left to take
    if state.status == GameStatus::Victory && !state.objectives.all_resolved() {
        violations.push(InvariantViolation::new(format!(
            "victory with {} active objectives",
            state.objectives.active().count()
        )));
    }

    // Building levels
    for (name, level) in [
        ("storage", state.base.storage_level),
        ("barracks", state.base.barracks_level),
    ] {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            violations.push(InvariantViolation::new(format!(
                "{name} level {level} outside [{MIN_LEVEL}, {MAX_LEVEL}]"
            )));
        }
    }

    if !state.objectives.has_unique_ids() {
        violations.push(InvariantViolation::new("duplicate objective ids"));
    }

    // Statistics consistency
    let stats = &state.statistics;
    if stats.successes.saturating_add(stats.failures) != stats.operations {
        violations.push(InvariantViolation::new(format!(
            "{} successes + {} failures != {} operations",
            stats.successes, stats.failures, stats.operations
        )));
    }
    let map = state.objectives.stats();
    if stats.captures > map.captured {
        violations.push(InvariantViolation::new(format!(
            "{} captures recorded but only {} objectives captured",
            stats.captures, map.captured
        )));
    }
    if stats.destructions > map.destroyed {
        violations.push(InvariantViolation::new(format!(
            "{} destructions recorded but only {} objectives destroyed",
            stats.destructions, map.destroyed
        )));
    }
    if state.history.len() > stats.operations as usize {
        violations.push(InvariantViolation::new(format!(
            "history holds {} entries for {} operations",
            state.history.len(),
            stats.operations
        )));
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
