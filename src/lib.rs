//! Docker-compose services as legacy container-link environment variables.
//!
//! `dockerlink` lets integration tests find the services of a running
//! docker-compose project the same way linked containers once did. At suite
//! start it asks the container engine for the project's running containers
//! and records every published port. Before each test it sets, for a
//! service `postgres` listening on TCP port 5432:
//!
//! ```text
//! POSTGRES_PORT_5432_TCP=tcp://192.168.99.100:32768
//! POSTGRES_PORT_5432_TCP_ADDR=192.168.99.100
//! POSTGRES_PORT_5432_TCP_PORT=32768
//! POSTGRES_PORT_5432_TCP_PROTO=tcp
//! ```
//!
//! and after each test it restores the environment exactly, so tests never
//! leak variables into one another.
//!
//! # Modules
//!
//! - [`environment`]: Scoped snapshots that restore environment variables
//! - [`engine`]: Container engine connection and container listing
//! - [`discovery`]: Compose project discovery and the service directory
//! - [`injector`]: Projection of services into link variables
//! - [`fixture`]: Suite and per-test fixtures tying the pieces together
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`api`]: Library functions behind the `dockerlink` binary
//! - [`error`]: Semantic error types for the library

pub mod api;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod environment;
pub mod error;
pub mod fixture;
pub mod injector;
