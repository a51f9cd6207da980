//! CLI command implementations for Shadowops.

pub(crate) mod play;
pub(crate) mod replay;
pub(crate) mod verify;

mod output;

use clap::ValueEnum;
use shadowops::{GameManager, GameState, LoadOutcome, PersistError, Rejection, Script};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Output format for inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug, Error)]
#[error("{message}")]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<PersistError> for CliError {
    fn from(e: PersistError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<Rejection> for CliError {
    fn from(e: Rejection) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {e}"))
    }
}

/// Load the game at `path` into a manager.
///
/// A missing or corrupted save is an error: run `shadowops new` first.
fn open_session(path: &Path) -> Result<GameManager, CliError> {
    match shadowops::load_game(path)? {
        LoadOutcome::Loaded(state) => Ok(GameManager::from_state(*state)?),
        LoadOutcome::NoSave => Err(CliError::new(format!(
            "no game at {} (start one with `shadowops new`)",
            path.display()
        ))),
        LoadOutcome::Corrupted(reason) => Err(CliError::new(format!(
            "save at {} is corrupted: {reason}",
            path.display()
        ))),
    }
}

/// Export the manager's state and write it to `path`.
fn save_session(manager: &mut GameManager, path: &Path) -> Result<GameState, CliError> {
    let state = manager.export_state(unix_now());
    shadowops::save_game(&state, path)?;
    Ok(state)
}

/// Read a script file.
fn read_script(path: &Path) -> Result<Script, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::new(format!("Failed to parse {}: {e}", path.display())))
}

/// Seconds since the Unix epoch, or zero if the clock is before it.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowops::GameStatus;
    use tempfile::TempDir;

    #[test]
    fn test_error_messages_pass_through() {
        let err = CliError::from(Rejection::NotPlaying(GameStatus::Paused));
        assert_eq!(err.to_string(), Rejection::NotPlaying(GameStatus::Paused).to_string());
        assert_eq!(CliError::new("boom").to_string(), "boom");
    }

    #[test]
    fn test_open_session_without_save_fails() {
        let dir = TempDir::new().unwrap();
        let err = open_session(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("shadowops new"));
    }
}
