//! Semantic error types for the dockerlink library.
//!
//! This module defines the error hierarchy for dockerlink, following the
//! principle of using semantic error enums (via `thiserror`) for conditions the
//! caller might inspect, while reserving opaque errors (`eyre::Report`) for the
//! application boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::discovery::DiscoveryState;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while talking to the container engine.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Failed to connect to the container engine.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// The engine refused or failed the container listing.
    #[error("failed to list containers: {message}")]
    ListFailed {
        /// A description of the listing failure.
        message: String,
    },

    /// Health check failed - engine did not respond correctly.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// Health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },

    /// Failed to create the Tokio runtime used by the blocking APIs.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime failure.
        message: String,
    },
}

/// Errors raised when the discovery session is driven out of order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// `discover()` was called a second time on the same connection.
    #[error("services were already discovered for this connection")]
    AlreadyDiscovered,

    /// The session was closed before the requested operation.
    #[error("discovery session is closed")]
    Closed,

    /// A suite was built from a session that has not discovered services.
    #[error("discovery has not run (session is {state})")]
    NotDiscovered {
        /// The state the session was in.
        state: DiscoveryState,
    },
}

/// Errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// The current working directory could not be determined.
    #[error("cannot determine current directory: {message}")]
    CurrentDirUnavailable {
        /// A description of the I/O error.
        message: String,
    },

    /// A TLS certificate file required by the engine connection is missing.
    #[error("TLS material not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Top-level error type for dockerlink.
///
/// This enum aggregates all domain-specific errors into a single type. At the
/// application boundary (`main.rs`) these errors are converted to
/// `eyre::Report` for human-readable error reporting.
#[derive(Debug, Error)]
pub enum DockerlinkError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while talking to the container engine.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// The discovery session was used out of order.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// An error occurred during filesystem operations.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// A specialised `Result` type for dockerlink operations.
pub type Result<T> = std::result::Result<T, DockerlinkError>;
