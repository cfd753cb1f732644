//! Binding set health check

use crate::config::AppConfig;
use crate::health::check::{CheckResult, CheckStatus, SystemCheck};
use crate::input::{BindingSet, InputCoordinator, InputSettings};

/// Checks that each profile's binding set parses, validates and registers
pub struct BindingSetCheck {
    profiles: Vec<&'static str>,
}

impl BindingSetCheck {
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for BindingSetCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn check_set(label: &str, bindings: &BindingSet, config: &AppConfig) -> (CheckStatus, String) {
    let mut input = InputCoordinator::new(InputSettings::from(&config.input));
    match bindings.register(&mut input) {
        Ok(registered) => (
            CheckStatus::Pass,
            format!(
                "{}: {} inputs registered ({} buttons, {} axes, {} sticks)",
                label,
                registered.len(),
                bindings.buttons.len(),
                bindings.axes.len(),
                bindings.sticks.len()
            ),
        ),
        Err(e) => (CheckStatus::Fail, format!("{}: {}", label, e)),
    }
}

impl SystemCheck for BindingSetCheck {
    fn name(&self) -> &'static str {
        "Bindings"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates binding set files for each profile")
    }

    fn check(&self) -> CheckResult {
        let mut lines = Vec::new();

        for profile in &self.profiles {
            let config = match AppConfig::load(profile) {
                Ok(config) => config,
                Err(e) => {
                    lines.push((
                        CheckStatus::Warn,
                        format!("Profile '{}': no config ({}), skipped", profile, e),
                    ));
                    continue;
                }
            };

            let Some(path) = config.bindings_path() else {
                lines.push((
                    CheckStatus::Pass,
                    format!("Profile '{}': no binding file, built-in set in use", profile),
                ));
                continue;
            };

            let label = format!("Profile '{}' ({})", profile, path.display());
            match BindingSet::load(&path) {
                Ok(bindings) if bindings.is_empty() => lines.push((
                    CheckStatus::Warn,
                    format!("{}: binding set is empty", label),
                )),
                Ok(bindings) => lines.push(check_set(&label, &bindings, &config)),
                Err(e) => lines.push((CheckStatus::Fail, format!("{}: {}", label, e))),
            }
        }

        let builtin = BindingSet::builtin();
        let default_config = AppConfig {
            profile: "builtin".to_string(),
            window: Default::default(),
            input: Default::default(),
        };
        lines.push(check_set("Built-in set", &builtin, &default_config));

        let message = if lines.iter().any(|(s, _)| s.is_fail()) {
            "Invalid binding set"
        } else {
            "Binding sets valid"
        };
        CheckResult::from_lines(&lines, message)
    }
}
