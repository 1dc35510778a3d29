use crate::settings::config::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings loaded once per process. The file is created with defaults on
/// first run so users have something to edit.
#[derive(Clone, Debug)]
pub struct SettingsManager {
    settings_path: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Settings from ~/.langlearn-tts/settings.toml
    pub fn new() -> Result<Self> {
        Self::from_path(Self::home_dir()?.join("settings.toml"))
    }

    pub fn from_path(settings_path: PathBuf) -> Result<Self> {
        let settings = load_or_reset(&settings_path)?;
        Ok(Self {
            settings_path,
            settings,
        })
    }

    /// Base directory for settings and logs (~/.langlearn-tts)
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".langlearn-tts"))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}

/// A missing file becomes the defaults; an unparsable one is moved aside
/// to `settings.toml.backup` and replaced by the defaults.
fn load_or_reset(path: &Path) -> Result<Settings> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(?path, "No settings file, writing defaults");
            return write_defaults(path);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {path:?}")),
    };

    let parse_error = match toml::from_str(&contents) {
        Ok(settings) => return Ok(settings),
        Err(e) => e,
    };

    let backup = path.with_extension("toml.backup");
    warn!(?path, ?backup, error = %parse_error, "Unreadable settings, restoring defaults");
    fs::rename(path, &backup).with_context(|| format!("Failed to move {path:?} to {backup:?}"))?;
    write_defaults(path)
}

fn write_defaults(path: &Path) -> Result<Settings> {
    let settings = Settings::default();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {dir:?}"))?;
    }
    let contents = toml::to_string_pretty(&settings)?;
    fs::write(path, contents).with_context(|| format!("Failed to write {path:?}"))?;
    Ok(settings)
}
