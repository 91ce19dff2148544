use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::AnalyticsError;

/// 1-based city numbers compared in the report when nothing is configured.
pub const DEFAULT_COMPARE: [usize; 4] = [2, 3, 4, 5];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// dataset = "/home/me/.local/share/weather-analytics/dataset.toml"
/// compare = [2, 3, 4, 5]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Dataset file used when no `--dataset` is given.
    pub dataset: Option<PathBuf>,

    /// City numbers (1-based) for the comparative analysis line.
    pub compare: Option<[usize; 4]>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-analytics", "weather-analytics")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Where `init` writes the reference dataset.
    pub fn default_dataset_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("dataset.toml"))
    }

    /// Record a dataset path, replacing any previous one.
    pub fn set_dataset(&mut self, path: PathBuf) {
        self.dataset = Some(path);
    }

    /// Zero-based indices of the four compared cities.
    pub fn compare_indices(&self) -> Result<[usize; 4], AnalyticsError> {
        city_numbers_to_indices(self.compare.unwrap_or(DEFAULT_COMPARE))
    }
}

/// Convert user-facing 1-based city numbers into dataset indices.
pub fn city_numbers_to_indices(numbers: [usize; 4]) -> Result<[usize; 4], AnalyticsError> {
    let mut indices = [0; 4];
    for (slot, number) in indices.iter_mut().zip(numbers) {
        *slot = number
            .checked_sub(1)
            .ok_or(AnalyticsError::InvalidCityNumber { number })?;
    }
    Ok(indices)
}
