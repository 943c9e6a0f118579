//! Configuration system for dockerlink.
//!
//! This module provides the configuration structures and CLI definitions for
//! the dockerlink binary and fixtures. Configuration loading and precedence
//! merging is handled by the `ortho_config` crate: CLI flags override
//! environment variables, which override configuration files, which override
//! defaults.
//!
//! The configuration file is expected at `~/.config/dockerlink/config.toml` by
//! default, or `.dockerlink.toml` in the working directory.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_socket = "tcp://192.168.99.100:2376"
//! project = "myapp"
//! host_address = "192.168.99.100"
//!
//! [tls]
//! verify = true
//! cert_path = "/home/user/.docker/machine/certs"
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, EnvArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{AppConfig, TlsConfig};
