//! Runs a suite of health checks

use std::time::Instant;

use tracing::debug;

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Results of a suite run
#[derive(Debug)]
pub struct HealthCheckReport {
    /// Check name and result, in run order
    pub results: Vec<(String, CheckResult)>,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl HealthCheckReport {
    fn from_results(results: Vec<(String, CheckResult)>) -> Self {
        let count = |status| results.iter().filter(|(_, r)| r.status == status).count();
        Self {
            total: results.len(),
            passed: count(CheckStatus::Pass),
            warned: count(CheckStatus::Warn),
            failed: count(CheckStatus::Fail),
            results,
        }
    }

    /// No check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Process exit code: 0 all pass, 1 any fail, 2 warnings only
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }

    /// Result of the named check
    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|(check, _)| check == name)
            .map(|(_, result)| result)
    }
}

/// Collects checks and runs them in insertion order
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn run(self) -> HealthCheckReport {
        let results = self
            .checks
            .into_iter()
            .map(|check| {
                let start = Instant::now();
                let result = check.check().with_duration(start.elapsed());
                debug!(
                    check = check.name(),
                    status = ?result.status,
                    duration = ?result.duration,
                    "Health check finished"
                );
                (check.name().to_string(), result)
            })
            .collect();

        HealthCheckReport::from_results(results)
    }
}
