//! Configuration health check

use crate::config::AppConfig;
use crate::health::check::{CheckResult, CheckStatus, SystemCheck};
use crate::input::InputSettings;

/// Checks that every profile loads and yields usable input settings
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    /// Checks the debug and release profiles
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates profile loading from files and environment")
    }

    fn check(&self) -> CheckResult {
        let mut lines = Vec::new();

        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => {
                    let settings = InputSettings::from(&config.input);
                    lines.push((
                        CheckStatus::Pass,
                        format!(
                            "Profile '{}': window {}x{}, {} controller slots, buffer {:?}",
                            profile,
                            config.window.width,
                            config.window.height,
                            settings.controller_slots,
                            settings.button_timing.buffer
                        ),
                    ));
                    if config.input.controller_slots == 0 {
                        lines.push((
                            CheckStatus::Warn,
                            format!("Profile '{}': controller_slots is 0, using 1", profile),
                        ));
                    }
                }
                Err(e) => lines.push((
                    CheckStatus::Fail,
                    format!("Profile '{}': failed to load - {}", profile, e),
                )),
            }
        }

        match AppConfig::load_from_env() {
            Ok(config) => lines.push((
                CheckStatus::Pass,
                format!("Environment config: profile '{}' loaded", config.profile),
            )),
            Err(e) => lines.push((CheckStatus::Warn, format!("Environment config: {}", e))),
        }

        let message = if lines.iter().any(|(s, _)| s.is_fail()) {
            "Failed to load one or more config profiles".to_string()
        } else {
            format!("{} profiles validated", self.profiles.len())
        };
        CheckResult::from_lines(&lines, message)
    }
}
