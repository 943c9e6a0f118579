//! Command-line argument definitions for dockerlink.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for dockerlink.
#[derive(Debug, Parser)]
#[command(name = "dockerlink")]
#[command(
    author,
    version,
    about = "Expose docker-compose services as container-link environment variables"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container engine socket path or URL.
    #[arg(long, global = true)]
    pub engine_socket: Option<String>,

    /// Compose project name, overriding the working directory name.
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Address under which published ports are reachable.
    #[arg(long, global = true)]
    pub host_address: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the link environment variables for every discovered service.
    Env(EnvArgs),

    /// List discovered services and their published ports.
    Services,
}

/// Arguments for the `env` subcommand.
#[derive(Debug, Default, Parser)]
pub struct EnvArgs {
    /// Prefix each line with `export ` for sourcing from a POSIX shell.
    #[arg(long)]
    pub export: bool,
}
