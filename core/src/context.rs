//! Process-wide game context.
//!
//! The surrounding application builds one [`GameContext`] when it attaches
//! to an emulator and passes it by reference to every component for the
//! rest of the process lifetime. Nothing in the engine mutates it.

use std::path::{Path, PathBuf};

use autoplay_shared::{GameVersion, is_safe_profile_name};

use crate::config::{self, AutomationConfig};
use crate::error::ModeError;

/// A named automation profile and the directory its files live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub path: PathBuf,
}

impl Profile {
    /// Profile `name` rooted under `profiles_root`.
    pub fn new(profiles_root: &Path, name: &str) -> Result<Self, ModeError> {
        if !is_safe_profile_name(name) {
            return Err(ModeError::precondition(format!(
                "'{name}' cannot be used as a profile name"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            path: profiles_root.join(name),
        })
    }

    /// Profile whose directory is exactly `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

/// Active game variant, configuration and profile.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub version: GameVersion,
    pub config: AutomationConfig,
    pub profile: Profile,
}

impl GameContext {
    pub fn new(version: GameVersion, config: AutomationConfig, profile: Profile) -> Self {
        Self {
            version,
            config,
            profile,
        }
    }

    /// Build a context, reading the profile's `config.toml` (defaults if absent).
    pub fn load(version: GameVersion, profile: Profile) -> Self {
        let config = config::load(&profile.path);
        Self::new(version, config, profile)
    }
}
