// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Shadowops: a deterministic turn-based tactical operations engine.
//!
//! The player manages a resource ledger and a home base, and launches
//! operations (raid, robbery, capture, destruction) against objectives on a
//! 2D map. Every operation is resolved from a closed-form success
//! probability with no random draw, so identical inputs always produce
//! identical games.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / scripts / persistence       │
//! ├─────────────────────────────────────┤
//! │   GameManager (commands, queries)   │
//! ├─────────────────────────────────────┤
//! │   Rules: validate, resolve, map     │
//! ├─────────────────────────────────────┤
//! │   Data: Resource, Objective, Base   │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use shadowops::{ActionKind, GameManager, Outcome};
//!
//! let mut manager = GameManager::default();
//! let result = manager.execute_operation(ActionKind::Raid, 1).unwrap();
//! assert_eq!(result.outcome, Outcome::Success);
//! ```

pub mod error;
pub mod game;
pub mod persistence;
pub mod script;

pub use error::{PersistError, PersistResult, Rejection};

// Re-export key game types at crate root for convenience
pub use game::{
    ActionKind, BuildingKind, GameManager, GameState, GameStatus, NewGameConfig, Objective,
    ObjectiveId, ObjectiveKind, ObjectiveStatus, OperationAnalysis, OperationResult, Outcome,
    Position, Resource,
};
pub use persistence::{LoadOutcome, load_game, save_game};
pub use script::{Command, Script, ScriptRun, run_script, state_fingerprint};
