//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, CheckStatus, SystemCheck};

/// Checks that build metadata was captured
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata (rustc, target, timestamps, features)")
    }

    fn check(&self) -> CheckResult {
        let fields = [
            ("Version", build_info::PKG_VERSION),
            ("Build time", build_info::BUILD_TIMESTAMP),
            ("Rustc", build_info::RUSTC_SEMVER),
            ("Channel", build_info::RUSTC_CHANNEL),
            ("Target", build_info::CARGO_TARGET_TRIPLE),
            ("Opt level", build_info::CARGO_OPT_LEVEL),
        ];

        let mut lines: Vec<_> = fields
            .iter()
            .map(|(label, value)| {
                let status = if value.is_empty() {
                    CheckStatus::Warn
                } else {
                    CheckStatus::Pass
                };
                (status, format!("{}: {}", label, value))
            })
            .collect();

        lines.push((
            CheckStatus::Pass,
            format!("Gamepad backend: {}", build_info::gamepad_backend()),
        ));

        CheckResult::from_lines(&lines, build_info::version_string())
    }
}
