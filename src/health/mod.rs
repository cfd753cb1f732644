//! Health checks for configuration, bindings and the input pipeline
//!
//! Useful for:
//! - Validating a deployment's config and binding files before launch
//! - CI smoke tests of the input engine on the target platform
//! - Debugging startup problems
//!
//! # Example
//!
//! ```no_run
//! use kiln::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(BindingSetCheck::new())
//!     .add_check(InputPipelineCheck::new())
//!     .run();
//!
//! if report.is_healthy() {
//!     println!("All systems operational!");
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

/// Runs all default health checks and returns a report
pub fn run_all_checks() -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::BindingSetCheck::new())
        .add_check(checks::InputPipelineCheck::new())
        .add_check(checks::BuildInfoCheck::new())
        .add_check(checks::SystemInfoCheck::new())
        .run()
}
