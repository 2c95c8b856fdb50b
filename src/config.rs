use std::{ops::Not, path::PathBuf, time::Duration};

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Not for Theme {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl From<Theme> for egui::Visuals {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub time_format: String,
    pub theme: Theme,
    /// how long a notice stays on screen
    pub notice_seconds: u64,
    /// number of background threads writing alarms to disk
    pub persist_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: "%H:%M".to_string(),
            theme: Theme::Dark,
            notice_seconds: 4,
            persist_workers: 2,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// if the file can't be read or isn't valid toml
    pub fn load(path: PathBuf) -> Result<Self> {
        let config = std::fs::read_to_string(&path)?;
        toml::from_str(&config).map_err(|source| Error::Parse { path, source })
    }

    /// # Errors
    /// if the config dir can't be created or the file can't be written
    pub fn save(&self, path: PathBuf) -> Result<()> {
        let config = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, config)?;
        Ok(())
    }

    /// loads the config if there is one, otherwise falls back to the defaults
    ///
    /// # Errors
    /// if a config file exists but can't be loaded
    pub fn load_or_default() -> Result<Self> {
        if Self::is_config_present()? {
            Self::load(Self::config_path()?)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub const fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }

    fn project_dirs() -> Result<directories::ProjectDirs> {
        directories::ProjectDirs::from("", "", "simple_alarm").ok_or(Error::NoProjectDirs)
    }

    /// # Errors
    /// if there is no home directory to put the config in
    pub fn config_path() -> Result<PathBuf> {
        let mut path = Self::project_dirs()?.config_dir().to_path_buf();
        path.push("config.toml");
        Ok(path)
    }

    /// # Errors
    /// if there is no home directory to put the alarms in
    pub fn alarms_path() -> Result<PathBuf> {
        let mut path = Self::project_dirs()?.data_dir().to_path_buf();
        path.push("alarms.toml");
        Ok(path)
    }

    /// # Errors
    /// if there is no home directory to look in
    pub fn is_config_present() -> Result<bool> {
        Ok(Self::config_path()?.exists())
    }
}
