//! `dockerlink` application entry point.
//!
//! This binary prints the container-link environment for the current compose
//! project so shells and CI scripts can consume it. It uses `eyre` for opaque
//! error handling at the application boundary, converting domain-specific
//! errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`.dockerlink.toml`, `~/.config/dockerlink/config.toml`
//!    or the path from `DOCKERLINK_CONFIG_PATH`)
//! 3. Environment variables (`DOCKERLINK_*`)
//! 4. Command-line arguments
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=dockerlink=debug`
//! to see skipped containers and every variable that is set.

use clap::Parser;
use dockerlink::api::{discover_services, link_environment, render_env, render_services};
use dockerlink::config::{AppConfig, Cli, Commands, EnvArgs, load_config};
use dockerlink::error::Result as DockerlinkResult;
use dockerlink::injector::LinkProjector;
use eyre::{Report, Result as EyreResult};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "dockerlink=warn";

/// Application entry point.
fn main() -> EyreResult<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Install a stderr subscriber so stdout carries only command output.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
fn run(cli: &Cli, config: &AppConfig) -> DockerlinkResult<()> {
    match &cli.command {
        Commands::Env(args) => print_env(config, args),
        Commands::Services => print_services(config),
    }
}

/// Print the link variables for every discovered service.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_env(config: &AppConfig, args: &EnvArgs) -> DockerlinkResult<()> {
    let directory = discover_services(config)?;
    let env = link_environment(&directory, &LinkProjector);
    for line in render_env(&env, args.export) {
        println!("{line}");
    }
    Ok(())
}

/// Print one line per discovered service port.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_services(config: &AppConfig) -> DockerlinkResult<()> {
    let directory = discover_services(config)?;
    for line in render_services(&directory) {
        println!("{line}");
    }
    Ok(())
}
