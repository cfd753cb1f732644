//! Health check trait and result types

use std::time::Duration;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Usable, but something deserves attention
    Warn,
    Fail,
}

impl CheckStatus {
    /// True for Pass and Warn
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// The status as a colored label
    pub fn as_colored_str(&self) -> String {
        use colored::Colorize;
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

/// Result of a check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// One-line summary
    pub message: String,
    /// Multi-line breakdown printed under the table
    pub details: Option<String>,
    pub duration: Duration,
}

impl CheckResult {
    fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail, message)
    }

    /// Builds a result from detail lines, using the worst line status
    pub fn from_lines(lines: &[(CheckStatus, String)], message: impl Into<String>) -> Self {
        let status = lines
            .iter()
            .map(|(status, _)| *status)
            .max_by_key(|status| match status {
                CheckStatus::Pass => 0,
                CheckStatus::Warn => 1,
                CheckStatus::Fail => 2,
            })
            .unwrap_or(CheckStatus::Pass);

        let details = lines
            .iter()
            .map(|(status, line)| {
                let mark = match status {
                    CheckStatus::Pass => "✓",
                    CheckStatus::Warn => "⚠",
                    CheckStatus::Fail => "✗",
                };
                format!("  {} {}", mark, line)
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self::new(status, message).with_details(details)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A subsystem that can report on its own health
pub trait SystemCheck {
    /// Name shown in the report
    fn name(&self) -> &'static str;

    fn check(&self) -> CheckResult;

    /// What the check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}
