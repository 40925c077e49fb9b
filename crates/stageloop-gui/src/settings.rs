use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No user config directory available")]
    NoConfigDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub ui_scale: f32,
    pub show_grid: bool,
    /// Start with node dragging and editing disabled
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    #[serde(alias = "Light")]
    Latte,
    Frappe,
    Macchiato,
    #[default]
    #[serde(alias = "Dark")]
    Mocha,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Mocha,
            ui_scale: 1.0,
            show_grid: true,
            locked: false,
        }
    }
}

impl AppSettings {
    fn settings_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("stageloop").join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn load() -> Self {
        match Self::settings_path() {
            Ok(path) => {
                tracing::info!("Loading settings from {:?}", path);
                if path.exists() {
                    match Self::load_from(&path) {
                        Ok(settings) => {
                            tracing::info!("Settings loaded successfully: {:?}", settings);
                            return settings;
                        }
                        Err(e) => tracing::error!("Failed to load settings: {}", e),
                    }
                } else {
                    tracing::info!("Settings file not found, using defaults");
                }
            }
            Err(e) => tracing::warn!("{}", e),
        }
        Self::default()
    }

    pub fn save(&self) {
        match Self::settings_path() {
            Ok(path) => {
                if let Err(e) = self.save_to(&path) {
                    tracing::error!("Failed to save settings: {}", e);
                }
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }
}
