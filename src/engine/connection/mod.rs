//! Socket resolution and container engine connection.
//!
//! This module resolves the container engine endpoint from configuration,
//! ambient environment variables and platform defaults, then establishes a
//! connection using the Bollard library. It also derives the host address
//! under which published container ports are reachable.

mod error_classification;
mod health_check;
mod tls;

use bollard::Docker;
use tracing::debug;
use url::{Host, Url};

pub use tls::TlsSettings;

use crate::config::AppConfig;
use crate::error::{ContainerError, DockerlinkError};

/// Environment variable names checked in fallback order after configuration sources.
const FALLBACK_ENV_VARS: &[&str] = &["DOCKER_HOST", "CONTAINER_HOST", "PODMAN_HOST"];

/// Connection timeout in seconds for Docker/Podman API connections.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Timeout in seconds for health check operations.
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;

/// Address reported for engines reached through a local socket or pipe.
const LOCAL_HOST_ADDRESS: &str = "127.0.0.1";

/// Default socket path for Unix platforms.
#[cfg(unix)]
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

/// Default socket path for Windows platforms.
#[cfg(windows)]
const DEFAULT_SOCKET: &str = "npipe:////./pipe/docker_engine";

/// Resolves container engine settings from environment variables.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing for testable environment variable access.
pub struct SocketResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> SocketResolver<'a, E> {
    /// Creates a new socket resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves the socket endpoint from fallback environment variables.
    ///
    /// Checks `DOCKER_HOST`, `CONTAINER_HOST` and `PODMAN_HOST` in that
    /// order and returns the first non-empty value.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Returns a non-empty environment variable value.
    #[must_use]
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.env.string(name).filter(|value| !value.is_empty())
    }

    /// Returns the platform default socket path.
    #[must_use]
    pub const fn default_socket() -> &'static str {
        DEFAULT_SOCKET
    }
}

/// Classifies socket endpoint types for connection handling.
enum SocketType {
    /// Unix socket or Windows named pipe with explicit scheme.
    Socket,
    /// HTTP, HTTPS, or TCP endpoint (TCP is rewritten to HTTP).
    Http,
    /// Bare path without scheme prefix.
    BarePath,
}

impl SocketType {
    fn classify(socket: &str) -> Self {
        if socket.starts_with("unix://") || socket.starts_with("npipe://") {
            Self::Socket
        } else if ["tcp://", "http://", "https://"]
            .iter()
            .any(|scheme| socket.starts_with(scheme))
        {
            Self::Http
        } else {
            Self::BarePath
        }
    }
}

/// A fully resolved engine endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEndpoint {
    socket: String,
    tls: Option<TlsSettings>,
    host_address: String,
}

impl EngineEndpoint {
    /// Resolve the endpoint from configuration and the ambient environment.
    ///
    /// The socket comes from `config.engine_socket`, then `DOCKER_HOST`,
    /// `CONTAINER_HOST`, `PODMAN_HOST`, then the platform default. The host
    /// address is `config.host_address` when set, otherwise it is derived
    /// from the socket with [`EngineConnector::host_address`].
    ///
    /// # Errors
    ///
    /// Returns an error when TLS is requested but the certificate directory
    /// is not configured or lacks one of the required PEM files.
    pub fn resolve<E: mockable::Env>(config: &AppConfig, env: &E) -> Result<Self, DockerlinkError> {
        let resolver = SocketResolver::new(env);
        let socket = EngineConnector::resolve_socket(config.engine_socket.as_deref(), &resolver);
        let tls = TlsSettings::resolve(&config.tls, &resolver)?;
        let host_address = config
            .host_address
            .as_deref()
            .filter(|address| !address.trim().is_empty())
            .map_or_else(|| EngineConnector::host_address(&socket), String::from);

        debug!(%socket, %host_address, tls = tls.is_some(), "resolved engine endpoint");
        Ok(Self {
            socket,
            tls,
            host_address,
        })
    }

    /// Build an endpoint from explicit parts.
    #[must_use]
    pub fn new(socket: impl Into<String>, tls: Option<TlsSettings>) -> Self {
        let socket_value = socket.into();
        let host_address = EngineConnector::host_address(&socket_value);
        Self {
            socket: socket_value,
            tls,
            host_address,
        }
    }

    /// The socket or URL used to reach the engine.
    #[must_use]
    pub const fn socket(&self) -> &str {
        self.socket.as_str()
    }

    /// TLS material, when the connection is encrypted.
    #[must_use]
    pub const fn tls(&self) -> Option<&TlsSettings> {
        self.tls.as_ref()
    }

    /// Address under which published ports are reachable.
    #[must_use]
    pub const fn host_address(&self) -> &str {
        self.host_address.as_str()
    }
}

/// Provides methods to connect to Docker or Podman container engines.
///
/// The connector supports Unix sockets, Windows named pipes, HTTP, HTTPS and
/// TLS-secured TCP endpoints.
pub struct EngineConnector;

impl EngineConnector {
    /// Connect to the container engine at the specified socket path.
    ///
    /// Supports the following endpoint formats:
    /// - Unix sockets: `unix:///path/to/socket`
    /// - Windows named pipes: `npipe:////./pipe/name`
    /// - TCP: `tcp://host:port` (treated as HTTP connection)
    /// - HTTP: `http://host:port`
    /// - HTTPS: `https://host:port`
    /// - Bare paths: paths starting with `\\` or `//` are named pipes, all
    ///   other paths are Unix sockets.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed`, `SocketNotFound` or
    /// `PermissionDenied` if the connection cannot be established.
    pub fn connect(socket: &str) -> Result<Docker, DockerlinkError> {
        let (uri, result) = match SocketType::classify(socket) {
            SocketType::Socket => (
                String::from(socket),
                Docker::connect_with_socket(
                    socket,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                ),
            ),
            SocketType::Http => {
                let http_socket = socket.replacen("tcp://", "http://", 1);
                let connected = Docker::connect_with_http(
                    &http_socket,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                );
                (http_socket, connected)
            }
            SocketType::BarePath => {
                let socket_uri = Self::normalize_bare_path(socket);
                let connected = Docker::connect_with_socket(
                    &socket_uri,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                );
                (socket_uri, connected)
            }
        };

        result.map_err(|error| {
            DockerlinkError::from(error_classification::classify_connection_error(&error, &uri))
        })
    }

    /// Connect to a resolved endpoint, using TLS when the endpoint carries
    /// certificate material.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed` if the client cannot be
    /// created.
    pub fn connect_endpoint(endpoint: &EngineEndpoint) -> Result<Docker, DockerlinkError> {
        let Some(tls) = endpoint.tls() else {
            return Self::connect(endpoint.socket());
        };

        Docker::connect_with_ssl(
            endpoint.socket(),
            tls.key_path().as_std_path(),
            tls.cert_path().as_std_path(),
            tls.ca_path().as_std_path(),
            CONNECTION_TIMEOUT_SECS,
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|error| {
            DockerlinkError::from(ContainerError::ConnectionFailed {
                message: error.to_string(),
            })
        })
    }

    fn normalize_bare_path(path: &str) -> String {
        if path.starts_with("\\\\") || path.starts_with("//") {
            format!("npipe://{path}")
        } else {
            format!("unix://{path}")
        }
    }

    /// Resolves the socket endpoint without establishing a connection.
    ///
    /// Resolution order:
    /// 1. `config_socket` (from CLI, config file, or `DOCKERLINK_ENGINE_SOCKET`)
    /// 2. `DOCKER_HOST`, `CONTAINER_HOST`, `PODMAN_HOST` (via resolver)
    /// 3. Platform default socket
    #[must_use]
    pub fn resolve_socket<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> String {
        config_socket
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| resolver.resolve_from_env())
            .unwrap_or_else(|| SocketResolver::<E>::default_socket().to_owned())
    }

    /// Derive the address under which published ports are reachable.
    ///
    /// Remote endpoints (`tcp://`, `http://`, `https://`) publish ports on
    /// their own host, so the endpoint host is returned with IPv6 brackets
    /// removed. Local sockets and pipes publish on the loopback interface.
    #[must_use]
    pub fn host_address(socket: &str) -> String {
        if !matches!(SocketType::classify(socket), SocketType::Http) {
            return String::from(LOCAL_HOST_ADDRESS);
        }

        Url::parse(socket)
            .ok()
            .and_then(|url| {
                url.host().map(|host| match host {
                    Host::Domain(domain) => String::from(domain),
                    Host::Ipv4(address) => address.to_string(),
                    Host::Ipv6(address) => address.to_string(),
                })
            })
            .unwrap_or_else(|| String::from(LOCAL_HOST_ADDRESS))
    }
}


#[cfg(test)]
mod tests_tcp;
