//! Error types for the engine.
//!
//! Gameplay rejections are ordinary values: a command that cannot run
//! returns a [`Rejection`] and leaves the state untouched. Persistence
//! failures are reported separately through [`PersistError`].

use std::io;

use thiserror::Error;

use crate::game::{BuildingKind, GameStatus, ObjectiveId, Resource, Validation};

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    /// The game is paused or over.
    #[error("game is not in progress (status: {0})")]
    NotPlaying(GameStatus),
    /// No objective with this id exists.
    #[error("unknown objective: {0}")]
    UnknownObjective(ObjectiveId),
    /// The operation failed its precondition checks.
    #[error("operation rejected: {}", format_reasons(.0))]
    Invalid(Validation),
    /// The building cannot be upgraded further.
    #[error("{0} is already at max level")]
    MaxLevel(BuildingKind),
    /// The ledger cannot cover the cost.
    #[error("insufficient resources: need {required}, have {available}")]
    InsufficientResources {
        /// Cost of the command.
        required: Resource,
        /// Current ledger.
        available: Resource,
    },
    /// The command would push a field above its ceiling.
    #[error("capacity exceeded: would hold {requested}, ceiling is {capacity}")]
    CapacityExceeded {
        /// Ledger after the command.
        requested: Resource,
        /// Base ceilings.
        capacity: Resource,
    },
    /// A purchase or recruitment of nothing.
    #[error("quantity must be positive")]
    ZeroQuantity,
    /// An imported snapshot breaks structural invariants.
    #[error("invalid snapshot: {}", .0.join("; "))]
    InvalidSnapshot(Vec<String>),
}

fn format_reasons(validation: &Validation) -> String {
    validation
        .reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure while saving or loading a game.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The state could not be encoded.
    #[error("failed to encode game state: {0}")]
    Encode(#[source] serde_json::Error),
    /// The snapshot could not be decoded.
    #[error("failed to decode game state: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;
