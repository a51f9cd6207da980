//! Command scripts and deterministic replay.
//!
//! A [`Script`] is a starting config plus a list of commands. Running it
//! against a fresh [`GameManager`] always produces the same [`ScriptRun`],
//! which makes scripts usable as golden files: the fingerprint of the final
//! state pins the whole run.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::{
    ActionKind, BuildingKind, GameManager, GameState, NewGameConfig, ObjectiveId, OperationResult,
    Resource,
};

/// One command against the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Discard the game and start over with the script's config.
    NewGame,
    /// Run an operation against an objective.
    ExecuteOperation {
        /// Operation kind.
        action: ActionKind,
        /// Target objective id.
        objective: ObjectiveId,
    },
    /// Upgrade a building.
    Upgrade {
        /// Building to upgrade.
        building: BuildingKind,
    },
    /// Recruit units.
    Recruit {
        /// Units to recruit.
        count: u32,
    },
    /// Buy supplies.
    Purchase {
        /// Ammo to buy.
        #[serde(default)]
        ammo: u32,
        /// Food to buy.
        #[serde(default)]
        food: u32,
    },
    /// Pause the game.
    Pause,
    /// Resume the game.
    Resume,
}

/// What a single command did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A new game was started.
    Started,
    /// An operation was resolved.
    Resolved {
        /// The operation record.
        result: Box<OperationResult>,
    },
    /// A building went up a level.
    Upgraded {
        /// The building.
        building: BuildingKind,
        /// Its new level.
        level: u8,
    },
    /// Units were recruited, or supplies bought.
    Paid {
        /// Amount paid.
        cost: Resource,
    },
    /// Pause or resume; `changed` is false for a no-op.
    Toggled {
        /// Whether the status changed.
        changed: bool,
    },
    /// The command was refused.
    Rejected {
        /// Human-readable reason.
        reason: String,
    },
}

impl CommandOutcome {
    /// Whether the command was refused.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, CommandOutcome::Rejected { .. })
    }
}

/// A replayable game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Config for the initial game and for every `new_game` command.
    pub config: NewGameConfig,
    /// Commands in order.
    pub commands: Vec<Command>,
}

/// Result of running a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRun {
    /// One outcome per command.
    pub outcomes: Vec<CommandOutcome>,
    /// State after the last command.
    pub final_state: GameState,
    /// [`state_fingerprint`] of the final state.
    pub fingerprint: u64,
}

impl ScriptRun {
    /// Number of refused commands.
    #[must_use]
    pub fn rejections(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_rejected()).count()
    }
}

/// Apply one command to a manager.
pub fn apply_command(
    manager: &mut GameManager,
    config: &NewGameConfig,
    command: &Command,
) -> CommandOutcome {
    let outcome = match *command {
        Command::NewGame => {
            manager.start_new_game(config.clone());
            Ok(CommandOutcome::Started)
        }
        Command::ExecuteOperation { action, objective } => manager
            .execute_operation(action, objective)
            .map(|result| CommandOutcome::Resolved {
                result: Box::new(result),
            }),
        Command::Upgrade { building } => manager
            .upgrade_building(building)
            .map(|level| CommandOutcome::Upgraded { building, level }),
        Command::Recruit { count } => manager
            .recruit_units(count)
            .map(|cost| CommandOutcome::Paid { cost }),
        Command::Purchase { ammo, food } => manager
            .purchase_supplies(ammo, food)
            .map(|cost| CommandOutcome::Paid { cost }),
        Command::Pause => Ok(CommandOutcome::Toggled {
            changed: manager.pause_game(),
        }),
        Command::Resume => Ok(CommandOutcome::Toggled {
            changed: manager.resume_game(),
        }),
    };
    outcome.unwrap_or_else(|rejection| CommandOutcome::Rejected {
        reason: rejection.to_string(),
    })
}

/// Run a script from a fresh game.
#[must_use]
pub fn run_script(script: &Script) -> ScriptRun {
    let mut manager = GameManager::new(script.config.clone());
    let outcomes: Vec<_> = script
        .commands
        .iter()
        .map(|command| apply_command(&mut manager, &script.config, command))
        .collect();

    let final_state = manager.state().clone();
    let fingerprint = state_fingerprint(&final_state);
    debug!(commands = outcomes.len(), fingerprint, "script finished");

    ScriptRun {
        outcomes,
        final_state,
        fingerprint,
    }
}

/// Stable 64-bit digest of a state's canonical JSON encoding.
#[must_use]
pub fn state_fingerprint(state: &GameState) -> u64 {
    // Encoding a GameState cannot fail: every map key is a string.
    let bytes = serde_json::to_vec(state).unwrap_or_default();
    fnv1a(&bytes)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}
