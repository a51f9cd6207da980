//! Interactive commands against the saved game.
//!
//! Each command loads the save, applies one command, and writes the save
//! back only if the command changed something.

use super::output::{JsonStatus, format_preview, format_result, format_status};
use super::{CliError, OutputFormat, open_session, save_session};
use shadowops::{ActionKind, BuildingKind, GameManager, NewGameConfig, ObjectiveId};
use std::fs;
use std::path::Path;

/// Start a new game and write it to `save`.
///
/// # Errors
///
/// Returns an error if the config cannot be read or the save cannot be written.
pub(crate) fn new_game(save: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let config = match config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::new(format!("Failed to read {}: {e}", path.display()))
            })?;
            serde_json::from_str::<NewGameConfig>(&text)?
        }
        None => NewGameConfig::default(),
    };

    let mut manager = GameManager::new(config);
    save_session(&mut manager, save)?;
    print!("{}", format_status(&manager));
    Ok(())
}

/// Print the saved game.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded.
pub(crate) fn status(save: &Path, format: OutputFormat) -> Result<(), CliError> {
    let manager = open_session(save)?;
    match format {
        OutputFormat::Text => print!("{}", format_status(&manager)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonStatus::from_manager(&manager))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Execute an operation and save.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded or the operation is rejected.
pub(crate) fn operation(
    save: &Path,
    action: ActionKind,
    objective: ObjectiveId,
) -> Result<(), CliError> {
    let mut manager = open_session(save)?;
    let before = manager.status();
    let result = manager.execute_operation(action, objective)?;
    save_session(&mut manager, save)?;

    print!("{}", format_result(&result));
    if manager.status() != before {
        println!("Game over: {}", manager.status());
    }
    Ok(())
}

/// Preview an operation without changing the save.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded or the objective is unknown.
pub(crate) fn preview(
    save: &Path,
    action: ActionKind,
    objective: ObjectiveId,
) -> Result<(), CliError> {
    let manager = open_session(save)?;
    let analysis = manager.analyze_operation(action, objective)?;
    let validation = manager.validate_operation(action, objective)?;
    print!("{}", format_preview(&analysis, &validation));
    Ok(())
}

/// Upgrade a building and save.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded or the upgrade is rejected.
pub(crate) fn upgrade(save: &Path, building: BuildingKind) -> Result<(), CliError> {
    let mut manager = open_session(save)?;
    let level = manager.upgrade_building(building)?;
    save_session(&mut manager, save)?;
    println!("{building} upgraded to level {level}");
    Ok(())
}

/// Recruit units and save.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded or recruitment is rejected.
pub(crate) fn recruit(save: &Path, count: u32) -> Result<(), CliError> {
    let mut manager = open_session(save)?;
    let cost = manager.recruit_units(count)?;
    save_session(&mut manager, save)?;
    println!(
        "Recruited {count} units for {cost} ({} units total)",
        manager.resources().units
    );
    Ok(())
}

/// Buy supplies and save.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded or the purchase is rejected.
pub(crate) fn buy(save: &Path, ammo: u32, food: u32) -> Result<(), CliError> {
    let mut manager = open_session(save)?;
    let cost = manager.purchase_supplies(ammo, food)?;
    save_session(&mut manager, save)?;
    println!("Bought {ammo} ammo and {food} food for {cost}");
    Ok(())
}

/// Pause the game and save.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded or written.
pub(crate) fn pause(save: &Path) -> Result<(), CliError> {
    let mut manager = open_session(save)?;
    if manager.pause_game() {
        save_session(&mut manager, save)?;
        println!("Game paused");
    } else {
        println!("Nothing to pause (status: {})", manager.status());
    }
    Ok(())
}

/// Resume the game and save.
///
/// # Errors
///
/// Returns an error if the save cannot be loaded or written.
pub(crate) fn resume(save: &Path) -> Result<(), CliError> {
    let mut manager = open_session(save)?;
    if manager.resume_game() {
        save_session(&mut manager, save)?;
        println!("Game resumed");
    } else {
        println!("Nothing to resume (status: {})", manager.status());
    }
    Ok(())
}
