//! Per-profile persisted files
//!
//! Reads degrade to an empty value on any failure. Writes stage the full
//! content in a sibling `.tmp` file, force it to disk and rename it over the
//! destination, so a reader only ever sees the old or the new content.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::backend::Creature;
use crate::context::Profile;

/// History of soft-reset frame observations, a JSON array.
pub const RNG_STATE_HISTORY_FILE: &str = "soft_reset_frames.json";

/// Directory under the profile holding exported creatures.
pub const CREATURE_EXPORT_DIR: &str = "pokemon";

/// Read a text file, `None` if it is missing or unreadable.
pub fn read_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Atomically replace `path` with `value`. Returns `false` on any failure.
pub fn write_file(path: &Path, value: &str) -> bool {
    match write_atomically(path, value.as_bytes()) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to write {}: {}", path.display(), e);
            false
        }
    }
}

fn tmp_path_for(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let mut tmp_name = OsString::from(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

/// Stage `bytes` in `<path>.tmp`, sync it and rename it over `path`.
/// The staging file is removed if any step fails.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = tmp_path_for(path)?;

    let result = (|| {
        {
            let mut f = fs::File::create(&tmp_path)?;
            f.write_all(bytes)?;
            f.sync_all()?;
        }
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() && tmp_path.exists() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

// ============================================================================
// Creature export
// ============================================================================

/// File name an exported creature is stored under.
///
/// `{dex}[ ★] - {nickname} - {nature} [{iv sum}] - {personality value}.pk3`
pub fn export_file_name(creature: &Creature) -> String {
    let shiny = if creature.is_shiny { " ★" } else { "" };
    format!(
        "{}{} - {} - {} [{}] - {:X}.pk3",
        creature.national_dex_number,
        shiny,
        sanitize(&creature.name),
        creature.nature,
        creature.iv_sum,
        creature.personality_value,
    )
}

/// Nicknames may carry characters no file system accepts.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Write the creature's raw data to the profile's export directory.
///
/// An existing file with the same name is deleted first. Returns the path
/// written.
pub fn save_pk3(profile: &Profile, creature: &Creature) -> io::Result<PathBuf> {
    let dir = profile.path.join(CREATURE_EXPORT_DIR);
    fs::create_dir_all(&dir)?;

    let path = dir.join(export_file_name(creature));
    match fs::remove_file(&path) {
        Ok(()) => debug!("Replacing {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    fs::write(&path, &creature.data)?;
    Ok(path)
}

// ============================================================================
// RNG state history
// ============================================================================

fn rng_history_path(profile: &Profile) -> PathBuf {
    profile.path.join(RNG_STATE_HISTORY_FILE)
}

/// Past soft-reset observations, empty if none were saved or the file is
/// corrupt.
pub fn rng_state_history<T: DeserializeOwned>(profile: &Profile) -> Vec<T> {
    let path = rng_history_path(profile);
    let Some(content) = read_file(&path) else {
        return Vec::new();
    };
    match serde_json::from_str(&content) {
        Ok(history) => history,
        Err(e) => {
            warn!("Ignoring corrupt {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Replace the saved soft-reset history. Returns `false` on failure.
pub fn save_rng_state_history<T: Serialize>(profile: &Profile, history: &[T]) -> bool {
    let path = rng_history_path(profile);
    match serde_json::to_string(history) {
        Ok(json) => write_file(&path, &json),
        Err(e) => {
            warn!("Failed to encode {}: {}", path.display(), e);
            false
        }
    }
}
