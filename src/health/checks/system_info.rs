//! System information health check

use std::time::{Duration, Instant};

use sysinfo::System;

use crate::health::check::{CheckResult, CheckStatus, SystemCheck};

/// Checks host information and the monotonic clock frame timing relies on
pub struct SystemInfoCheck;

impl SystemInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest non-zero step the monotonic clock reports, if any within a budget
fn clock_resolution() -> Option<Duration> {
    let start = Instant::now();
    (0..100_000)
        .map(|_| Instant::now())
        .find(|now| *now > start)
        .map(|now| now - start)
}

impl SystemCheck for SystemInfoCheck {
    fn name(&self) -> &'static str {
        "System Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates OS, CPU, memory and clock information")
    }

    fn check(&self) -> CheckResult {
        let mut sys = System::new_all();
        sys.refresh_all();

        let unknown = || "Unknown".to_string();
        let mut lines = vec![
            (
                CheckStatus::Pass,
                format!(
                    "OS: {} {}",
                    System::name().unwrap_or_else(unknown),
                    System::os_version().unwrap_or_else(unknown)
                ),
            ),
            (
                CheckStatus::Pass,
                format!("Kernel: {}", System::kernel_version().unwrap_or_else(unknown)),
            ),
        ];

        let physical_cores = System::physical_core_count().unwrap_or(0);
        let logical_cores = sys.cpus().len();
        if physical_cores == 0 || logical_cores == 0 {
            lines.push((CheckStatus::Warn, "Unable to detect CPU cores".to_string()));
        } else {
            lines.push((
                CheckStatus::Pass,
                format!(
                    "CPU cores: {} physical, {} logical",
                    physical_cores, logical_cores
                ),
            ));
        }

        let total_memory_gb = sys.total_memory() as f64 / 1_073_741_824.0;
        let memory_status = if total_memory_gb < 1.0 {
            CheckStatus::Warn
        } else {
            CheckStatus::Pass
        };
        lines.push((
            memory_status,
            format!("Memory: {:.1} GB total", total_memory_gb),
        ));

        match clock_resolution() {
            Some(resolution) if resolution <= Duration::from_millis(1) => lines.push((
                CheckStatus::Pass,
                format!("Clock resolution: {:?}", resolution),
            )),
            Some(resolution) => lines.push((
                CheckStatus::Warn,
                format!("Clock resolution is coarse: {:?}", resolution),
            )),
            None => lines.push((
                CheckStatus::Warn,
                "Monotonic clock did not advance".to_string(),
            )),
        }

        if let Some(hostname) = System::host_name() {
            lines.push((CheckStatus::Pass, format!("Hostname: {}", hostname)));
        }

        let message = if lines.iter().any(|(s, _)| *s == CheckStatus::Warn) {
            "System info gathered with warnings"
        } else {
            "System info gathered successfully"
        };
        CheckResult::from_lines(&lines, message)
    }
}
