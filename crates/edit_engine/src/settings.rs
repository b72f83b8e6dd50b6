//! Engine settings management
//!
//! Settings are stored as pretty-printed JSON. A missing file yields the
//! defaults; a file that cannot be parsed is logged and replaced by the
//! defaults as well.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub general: GeneralSettings,
    pub history: HistorySettings,
    pub spatial_index: SpatialIndexSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Language code of the description table (e.g., "en", "es")
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo entries kept
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: crate::UndoManager::DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpatialIndexSettings {
    /// Side length of a grid cell in document units
    pub cell_size: f64,
}

impl Default for SpatialIndexSettings {
    fn default() -> Self {
        Self {
            cell_size: doc_model::SpatialIndex::DEFAULT_CELL_SIZE,
        }
    }
}

/// Loads and saves [`EngineSettings`] at a fixed path
pub struct SettingsManager {
    settings_path: PathBuf,
    current: EngineSettings,
}

impl SettingsManager {
    /// Create a settings manager storing `engine.json` in `config_dir`
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: config_dir.as_ref().join("engine.json"),
            current: EngineSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or return defaults if file doesn't exist
    pub fn load_sync(&mut self) -> Result<&EngineSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<EngineSettings>(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(
                        path = %self.settings_path.display(),
                        error = %e,
                        "Failed to parse settings file, using defaults"
                    );
                    EngineSettings::default()
                }
            }
        } else {
            EngineSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &EngineSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub fn update_sync(&mut self, settings: EngineSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults and save
    pub fn reset_sync(&mut self) -> Result<&EngineSettings> {
        self.current = EngineSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}
