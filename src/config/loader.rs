use super::profiles::SlimProfileManager;
use super::types::*;
use crate::utils::logging::{parse_level, LOG_LEVELS};
use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
    pub progress: ProgressConfig,
    pub selection: SelectionConfig,
    pub processing: ProcessingConfig,
    pub profiles: HashMap<String, SelectionOverrides>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Candidate locations in lookup order: `explicit`, `./config.yaml`, then
    /// the per-user config directory.
    pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        if let Some(path) = explicit {
            return vec![path.to_path_buf()];
        }

        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("video-slimmer").join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// The first existing candidate. An explicit path is returned even when it
    /// does not exist so loading it reports the error.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        Self::candidate_paths(None)
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Loads the located file, or built-in defaults when there is none.
    pub fn load_with_fallback(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => Self::load(&path).map_err(|e| match e {
                Error::Io(io) => Error::validation(format!(
                    "Cannot read configuration file {}: {}",
                    path.display(),
                    io
                )),
                other => other,
            }),
            None => Ok(Self::default()),
        }
    }

    pub fn profile_manager(&self) -> SlimProfileManager {
        SlimProfileManager::new(&self.profiles)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tools.ffmpeg.trim().is_empty() || self.tools.ffprobe.trim().is_empty() {
            return Err(Error::validation("tools.ffmpeg and tools.ffprobe must not be empty"));
        }

        if parse_level(&self.logging.level).is_none() {
            return Err(Error::validation(format!(
                "Invalid logging.level '{}' (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.progress.update_interval_ms == 0 {
            return Err(Error::validation(
                "progress.update_interval_ms must be greater than 0",
            ));
        }

        if self.selection.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(Error::validation("selection.languages contains an empty entry"));
        }

        for name in self.profiles.keys() {
            if name.trim().is_empty() {
                return Err(Error::validation("Profile names must not be empty"));
            }
        }

        Ok(())
    }
}
