//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::input::{ButtonTiming, DEFAULT_CONTROLLER_SLOTS, InputSettings, MaskSet};

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: f64,
    /// Window height
    pub height: f64,
    /// Whether the window should be fullscreen
    pub fullscreen: bool,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
    /// Whether to enable vsync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Kiln".to_string(),
            width: 800.0,
            height: 600.0,
            fullscreen: false,
            resizable: true,
            decorated: true,
            vsync: true,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Number of controller slots
    pub controller_slots: usize,
    /// How long a button press stays consumable
    pub press_buffer_ms: u64,
    /// Hold time before a held button starts repeating
    pub repeat_delay_ms: u64,
    /// Time between repeats
    pub repeat_interval_ms: u64,
    /// Masks active at startup
    pub masks: Vec<String>,
    /// Binding set file, relative to the config directory
    pub bindings: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            controller_slots: DEFAULT_CONTROLLER_SLOTS,
            press_buffer_ms: 0,
            repeat_delay_ms: 400,
            repeat_interval_ms: 50,
            masks: Vec::new(),
            bindings: None,
        }
    }
}

impl From<&InputConfig> for InputSettings {
    fn from(config: &InputConfig) -> Self {
        Self {
            // A zero-slot pool is a construction error
            controller_slots: config.controller_slots.max(1),
            button_timing: ButtonTiming {
                buffer: Duration::from_millis(config.press_buffer_ms),
                repeat_delay: Duration::from_millis(config.repeat_delay_ms),
                repeat_interval: Duration::from_millis(config.repeat_interval_ms),
            },
            masks: config.masks.iter().cloned().collect::<MaskSet>(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_INPUT__CONTROLLER_SLOTS=4)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let config_dir = Self::find_config_dir();

        let mut builder = Config::builder();

        if let Some(ref dir) = config_dir {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Use __ as separator for nested fields (e.g., APP_WINDOW__WIDTH)
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    pub fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Resolved path of the configured binding set, if any
    ///
    /// Relative paths are taken from the config directory.
    pub fn bindings_path(&self) -> Option<PathBuf> {
        let path = self.input.bindings.as_ref()?;
        if path.is_absolute() {
            return Some(path.clone());
        }
        Some(
            Self::find_config_dir()
                .unwrap_or_else(|| PathBuf::from("config"))
                .join(path),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self {
            profile: "release".to_string(),
            window: WindowConfig::default(),
            input: InputConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_config_maps_to_settings() {
        let config = InputConfig {
            controller_slots: 4,
            press_buffer_ms: 120,
            repeat_delay_ms: 300,
            repeat_interval_ms: 40,
            masks: vec!["keyboard".to_string()],
            bindings: None,
        };

        let settings = InputSettings::from(&config);
        assert_eq!(settings.controller_slots, 4);
        assert_eq!(settings.button_timing.buffer, Duration::from_millis(120));
        assert_eq!(settings.button_timing.repeat_delay, Duration::from_millis(300));
        assert_eq!(settings.button_timing.repeat_interval, Duration::from_millis(40));
        assert!(settings.masks.contains("keyboard"));
    }

    #[test]
    fn zero_slots_is_clamped() {
        let config = InputConfig {
            controller_slots: 0,
            ..Default::default()
        };
        assert_eq!(InputSettings::from(&config).controller_slots, 1);
    }

    #[test]
    fn missing_input_section_uses_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("profile", "test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.profile, "test");
        assert_eq!(config.input, InputConfig::default());
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn absolute_bindings_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindings.toml");
        let config = AppConfig {
            profile: "test".to_string(),
            window: WindowConfig::default(),
            input: InputConfig {
                bindings: Some(path.clone()),
                ..Default::default()
            },
        };
        assert_eq!(config.bindings_path(), Some(path));
    }
}
