//! Replay command implementation.

use super::output::format_run;
use super::{CliError, OutputFormat, read_script};
use shadowops::{GameManager, run_script, save_game};
use std::path::Path;

/// Run a script and print its outcomes.
///
/// With `keep`, the final state is also written to that save file.
///
/// # Errors
///
/// Returns an error if the script cannot be read or the save cannot be written.
pub(crate) fn execute(
    script: &Path,
    format: OutputFormat,
    keep: Option<&Path>,
) -> Result<(), CliError> {
    let script = read_script(script)?;
    let run = run_script(&script);

    match format {
        OutputFormat::Text => print!("{}", format_run(&run)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
    }

    if let Some(save) = keep {
        // Round-trip through the manager so the save passes import checks.
        let mut manager = GameManager::from_state(run.final_state)?;
        let state = manager.export_state(super::unix_now());
        save_game(&state, save)?;
    }

    Ok(())
}
