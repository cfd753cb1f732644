use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use kiln::app::{App, load_bindings};
use kiln::build_info;
use kiln::config::AppConfig;
use kiln::health;
use kiln::input::BindingSet;

#[derive(Parser, Debug)]
#[command(author, version, about = "Kiln window and input demo", long_about = None)]
struct Args {
    /// Configuration profile (defaults to APP_PROFILE, then "release")
    #[arg(short, long)]
    profile: Option<String>,

    /// Binding set file, overriding the profile's `input.bindings`
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Run the health checks and exit
    #[arg(long)]
    health: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.health {
        let report = health::run_all_checks();
        health::print_report(&report);
        std::process::exit(report.exit_code());
    }

    info!(build = %build_info::version_string(), "Kiln starting");

    let config = match &args.profile {
        Some(profile) => AppConfig::load(profile)
            .with_context(|| format!("failed to load profile '{}'", profile))?,
        None => AppConfig::load_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        }),
    };

    let bindings = match &args.bindings {
        Some(path) => BindingSet::load(path)
            .with_context(|| format!("failed to load bindings from {}", path.display()))?,
        None => load_bindings(&config),
    };

    let mut app = App::new(config, &bindings).context("failed to register bindings")?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app).context("event loop failed")?;

    Ok(())
}
