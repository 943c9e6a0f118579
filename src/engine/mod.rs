//! Container engine connection and container listing.
//!
//! This module provides the interface for connecting to Docker or Podman
//! container engines and listing their running containers. The socket
//! endpoint is resolved through a priority-based fallback chain:
//!
//! 1. CLI argument (`--engine-socket`)
//! 2. Config file (`engine_socket` in TOML)
//! 3. `DOCKERLINK_ENGINE_SOCKET` environment variable
//! 4. `DOCKER_HOST` environment variable
//! 5. `CONTAINER_HOST` environment variable
//! 6. `PODMAN_HOST` environment variable
//! 7. Platform default (`/var/run/docker.sock` on Unix)

mod connection;
mod listing;

pub use connection::{EngineConnector, EngineEndpoint, SocketResolver, TlsSettings};
pub use listing::{ContainerLister, ContainerRecord, ListContainersFuture, PortMapping};
