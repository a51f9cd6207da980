//! Save files for game state.
//!
//! A save is the pretty-printed JSON encoding of a [`GameState`]. Loading
//! distinguishes a missing save from a corrupted one so callers can start a
//! fresh game in the first case and warn in the second.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{PersistError, PersistResult};
use crate::game::GameState;

/// Result of looking for a save file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No save exists at the path.
    NoSave,
    /// A file exists but does not decode as a game state.
    Corrupted(String),
    /// The decoded snapshot.
    Loaded(Box<GameState>),
}

/// Write a game state to `path`, replacing any previous save.
///
/// # Errors
///
/// Returns an error if encoding or file I/O fails.
pub fn save_game(state: &GameState, path: &Path) -> PersistResult<()> {
    let encoded = serde_json::to_string_pretty(state).map_err(PersistError::Encode)?;
    fs::write(path, encoded)?;
    debug!(path = %path.display(), id = %state.id, "game saved");
    Ok(())
}

/// Read a game state from `path`.
///
/// # Errors
///
/// Returns an error only for I/O failures other than a missing file.
pub fn load_game(path: &Path) -> PersistResult<LoadOutcome> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadOutcome::NoSave),
        Err(e) => return Err(e.into()),
    };

    match decode_state(&contents) {
        Ok(state) => {
            debug!(path = %path.display(), id = %state.id, "game loaded");
            Ok(LoadOutcome::Loaded(Box::new(state)))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "save file is corrupted");
            Ok(LoadOutcome::Corrupted(e.to_string()))
        }
    }
}

/// Decode a game state from JSON text.
///
/// # Errors
///
/// Returns [`PersistError::Decode`] if the text is not a valid snapshot.
pub fn decode_state(json: &str) -> PersistResult<GameState> {
    serde_json::from_str(json).map_err(PersistError::Decode)
}

/// Delete the save at `path`. Returns `false` if there was none.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn delete_save(path: &Path) -> PersistResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
