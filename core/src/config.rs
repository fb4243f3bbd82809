//! Configuration management (`<profile>/config.toml`)
//!
//! Handles loading, saving, and providing defaults for automation settings.
//! Settings are stored in TOML format next to the profile's other files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the per-profile configuration.
pub const CONFIG_FILE: &str = "config.toml";

/// Automation configuration.
///
/// Contains all user-configurable settings organized into sections.
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AutomationConfig {
    /// Battle handling toggles
    #[serde(default)]
    pub battle: BattleConfig,
    /// Scheduler behaviour
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Battle configuration.
///
/// These toggles are owned by the battle collaborator; the engine only
/// reads them to check mode preconditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BattleConfig {
    /// Fight wild opponents instead of running (default: false)
    #[serde(default)]
    pub battle: bool,
    /// Collect items picked up by party members after battle (default: false)
    #[serde(default)]
    pub pickup: bool,
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Emit a progress line every N frames, 0 disables (default: 3600)
    #[serde(default = "default_log_interval_frames")]
    pub log_interval_frames: u64,
}

fn default_log_interval_frames() -> u64 {
    3600
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            log_interval_frames: default_log_interval_frames(),
        }
    }
}

/// Returns the platform-specific directory holding automation profiles.
///
/// On Windows: `%APPDATA%\Autoplay\data\profiles`
/// On macOS: `~/Library/Application Support/io.autoplay.Autoplay/profiles`
/// On Linux: `~/.local/share/autoplay/profiles`
///
/// Returns `None` if the home directory cannot be determined.
pub fn profiles_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.autoplay", "", "Autoplay")
        .map(|dirs| dirs.data_dir().join("profiles"))
}

/// Loads the configuration stored in `dir`.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load(dir: &Path) -> AutomationConfig {
    let path = dir.join(CONFIG_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return AutomationConfig::default();
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid config at {}: {}", path.display(), e);
            AutomationConfig::default()
        }
    }
}

/// Saves the configuration into `dir`.
///
/// Creates the directory if it doesn't exist. The file is replaced
/// atomically, so a failed save leaves the previous configuration intact.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(dir: &Path, config: &AutomationConfig) -> std::io::Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    crate::files::write_atomically(&dir.join(CONFIG_FILE), content.as_bytes())
}
