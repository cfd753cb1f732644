//! Table output for health check reports

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Formats a report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["System", "Status", "Duration", "Message"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{}\n{}", table, format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut lines = vec![
        format!("\n{}", "Summary".bold().underline()),
        format!("  Total checks: {}", report.total),
        format!("  {} Passed: {}", "✓".green(), report.passed),
    ];
    if report.warned > 0 {
        lines.push(format!("  {} Warned: {}", "⚠".yellow(), report.warned));
    }
    if report.failed > 0 {
        lines.push(format!("  {} Failed: {}", "✗".red(), report.failed));
    }

    let overall = match (report.is_healthy(), report.has_warnings()) {
        (false, _) => "Overall: UNHEALTHY".red().bold(),
        (true, true) => "Overall: HEALTHY (with warnings)".yellow().bold(),
        (true, false) => "Overall: HEALTHY".green().bold(),
    };
    lines.push(format!("\n  {}\n", overall));

    lines.join("\n")
}

/// Prints the report and every check's details to stdout
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));

    for (name, result) in &report.results {
        if let Some(details) = &result.details {
            println!("\n{} Details:\n{}", name.bold(), details);
        }
    }
}
