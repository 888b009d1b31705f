//! Configuration management

use crate::constants::{app, intervals, ui};
use crate::utils::{PanelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub window: WindowConfig,
    pub hotkeys: HotkeyConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
}

/// Window-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub min_width: f32,
    pub scale_factor: f32,
}

/// Global hotkey listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub enabled: bool,
    pub poll_interval_ms: u64,
}

/// Frame refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_to_file: bool,
    pub log_dir: Option<PathBuf>,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            min_width: ui::MIN_PANEL_WIDTH,
            scale_factor: ui::DEFAULT_SCALE_FACTOR,
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: intervals::HOTKEY_POLL,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: intervals::UI_REFRESH,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: app::DEFAULT_LOG_LEVEL.to_string(),
            log_to_file: true,
            log_dir: None,
            max_file_size: app::LOG_FILE_MAX_SIZE,
            max_files: app::LOG_FILE_MAX_COUNT,
        }
    }
}

impl PanelConfig {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from `path`, writing the defaults there if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: PanelConfig = toml::from_str(&content)?;

            log::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            log::info!("Created default configuration at {:?}", path);
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PanelError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the config file path
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PanelError::config("Cannot determine config directory"))?;

        Ok(config_dir.join(app::NAME).join("config.toml"))
    }

    /// Clamp configuration values into usable ranges
    pub fn validate(&mut self) -> Result<()> {
        self.window.min_width = self.window.min_width.clamp(80.0, 1920.0);
        self.window.scale_factor = self
            .window
            .scale_factor
            .clamp(ui::MIN_SCALE_FACTOR, ui::MAX_SCALE_FACTOR);

        self.hotkeys.poll_interval_ms = self.hotkeys.poll_interval_ms.clamp(1, 500);
        self.refresh.interval_ms = self.refresh.interval_ms.clamp(1, 1000);

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            log::warn!(
                "Unknown log level '{}', falling back to '{}'",
                self.logging.level,
                app::DEFAULT_LOG_LEVEL
            );
            self.logging.level = app::DEFAULT_LOG_LEVEL.to_string();
        }
        self.logging.max_file_size = self.logging.max_file_size.max(1_000_000); // At least 1MB
        self.logging.max_files = self.logging.max_files.clamp(1, 20);

        Ok(())
    }
}
