#![no_main]

//! Command sequence fuzzer.
//!
//! Drives the manager with arbitrary commands from an arbitrary starting
//! ledger and checks that every command either applies cleanly or leaves
//! the state untouched, with invariants holding throughout.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shadowops::game::check_invariants;
use shadowops::script::apply_command;
use shadowops::{ActionKind, BuildingKind, Command, GameManager, NewGameConfig, Resource};

/// A fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzCommand {
    Operation { action: u8, objective: u8 },
    Upgrade { barracks: bool },
    Recruit { count: u16 },
    Purchase { ammo: u16, food: u16 },
    Pause,
    Resume,
    NewGame,
}

impl FuzzCommand {
    fn to_command(&self) -> Command {
        match *self {
            FuzzCommand::Operation { action, objective } => Command::ExecuteOperation {
                action: ActionKind::ALL[usize::from(action) % ActionKind::ALL.len()],
                objective: u32::from(objective % 12),
            },
            FuzzCommand::Upgrade { barracks } => Command::Upgrade {
                building: if barracks {
                    BuildingKind::Barracks
                } else {
                    BuildingKind::Storage
                },
            },
            FuzzCommand::Recruit { count } => Command::Recruit {
                count: u32::from(count),
            },
            FuzzCommand::Purchase { ammo, food } => Command::Purchase {
                ammo: u32::from(ammo),
                food: u32::from(food),
            },
            FuzzCommand::Pause => Command::Pause,
            FuzzCommand::Resume => Command::Resume,
            FuzzCommand::NewGame => Command::NewGame,
        }
    }
}

/// Structured input for command fuzzing.
#[derive(Arbitrary, Debug)]
struct CommandInput {
    /// Starting ledger, clamped to capacity on game start.
    start: [u32; 4],
    /// Commands to apply in order.
    commands: Vec<FuzzCommand>,
}

fuzz_target!(|input: CommandInput| {
    let [money, ammo, food, units] = input.start;
    let config = NewGameConfig {
        resources: Resource::new(money, ammo, food, units),
        ..NewGameConfig::default()
    };
    let mut manager = GameManager::new(config.clone());

    // Cap command count to keep iterations fast
    for fuzz_command in input.commands.iter().take(256) {
        let command = fuzz_command.to_command();
        let before = manager.state().clone();

        let outcome = apply_command(&mut manager, &config, &command);
        if outcome.is_rejected() {
            assert_eq!(manager.state(), &before, "rejected {command:?} mutated state");
        }

        let violations = check_invariants(manager.state());
        assert!(
            violations.is_empty(),
            "Invariants violated after {command:?}: {violations:?}"
        );
    }
});
