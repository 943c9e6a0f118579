//! Compose service discovery.
//!
//! A [`Discovery`] session connects to the container engine once, lists the
//! running containers of the current compose project, and records every
//! published port in a [`ServiceDirectory`]. The session owns a Tokio runtime
//! and blocks on it, so callers stay synchronous; [`collect_services`] is
//! available for callers already inside an async context.
//!
//! A session moves through `Connected → Discovered → Closed`. Constructing
//! a session connects it, so there is no unconnected value to misuse.

mod collect;
mod directory;
mod project;


use std::fmt;

use bollard::Docker;
use tokio::runtime::Runtime;
use tracing::{debug, info};

pub use collect::{PROJECT_LABEL, SERVICE_LABEL, build_directory, collect_services};
pub use directory::{
    Protocol, ServiceDirectory, ServiceKey, ServicePort, UnsupportedProtocol,
};
pub use project::ProjectName;

use crate::config::AppConfig;
use crate::engine::{ContainerLister, EngineConnector, EngineEndpoint};
use crate::error::{DiscoveryError, DockerlinkError};

/// Lifecycle state of a discovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    /// Connected to the engine; discovery has not run.
    Connected,
    /// Discovery ran and the directory is available.
    Discovered,
    /// The engine session was released.
    Closed,
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connected => "connected",
            Self::Discovered => "discovered",
            Self::Closed => "closed",
        })
    }
}

/// A discovery session against one container engine.
pub struct Discovery<C: ContainerLister = Docker> {
    client: Option<C>,
    runtime: Runtime,
    project: ProjectName,
    host_address: String,
    state: DiscoveryState,
    directory: Option<ServiceDirectory>,
}

impl Discovery<Docker> {
    /// Connect to the engine named by configuration and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be determined, TLS material is
    /// missing, or the engine cannot be reached or does not answer a ping.
    pub fn connect(config: &AppConfig) -> Result<Self, DockerlinkError> {
        Self::connect_with_env(config, &mockable::DefaultEnv::new())
    }

    /// Connect using an explicit environment provider for the ambient
    /// `DOCKER_*` variables.
    ///
    /// # Errors
    ///
    /// See [`Self::connect`].
    pub fn connect_with_env<E: mockable::Env>(
        config: &AppConfig,
        env: &E,
    ) -> Result<Self, DockerlinkError> {
        let project = ProjectName::resolve(config.project.as_deref())?;
        let endpoint = EngineEndpoint::resolve(config, env)?;
        let runtime = EngineConnector::create_runtime()?;
        let docker = runtime.block_on(EngineConnector::connect_and_verify_async(&endpoint))?;
        info!(
            socket = endpoint.socket(),
            %project,
            host_address = endpoint.host_address(),
            "connected to container engine"
        );
        Ok(Self::with_runtime(
            docker,
            runtime,
            project,
            String::from(endpoint.host_address()),
        ))
    }
}

impl<C: ContainerLister> Discovery<C> {
    /// Wrap an existing client, such as a test double.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the session's
    /// runtime cannot be built.
    pub fn from_client(
        client: C,
        project: ProjectName,
        host_address: impl Into<String>,
    ) -> Result<Self, DockerlinkError> {
        let runtime = EngineConnector::create_runtime()?;
        Ok(Self::with_runtime(client, runtime, project, host_address.into()))
    }

    const fn with_runtime(
        client: C,
        runtime: Runtime,
        project: ProjectName,
        host_address: String,
    ) -> Self {
        Self {
            client: Some(client),
            runtime,
            project,
            host_address,
            state: DiscoveryState::Connected,
            directory: None,
        }
    }

    /// List containers and build the service directory.
    ///
    /// Runs at most once per session.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::AlreadyDiscovered` on a second call,
    /// `DiscoveryError::Closed` after [`Self::close`], and
    /// `ContainerError::ListFailed` when the engine cannot list containers.
    pub fn discover(&mut self) -> Result<&ServiceDirectory, DockerlinkError> {
        match self.state {
            DiscoveryState::Connected => {}
            DiscoveryState::Discovered => return Err(DiscoveryError::AlreadyDiscovered.into()),
            DiscoveryState::Closed => return Err(DiscoveryError::Closed.into()),
        }
        let client = self.client.as_ref().ok_or(DiscoveryError::Closed)?;

        let directory = self.runtime.block_on(collect_services(
            client,
            &self.project,
            &self.host_address,
        ))?;
        info!(services = directory.len(), project = %self.project, "discovered services");

        self.state = DiscoveryState::Discovered;
        Ok(self.directory.insert(directory))
    }

    /// Release the engine session. Calling this again has no effect.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(project = %self.project, "closed container engine session");
        }
        self.state = DiscoveryState::Closed;
    }

    /// The directory built by [`Self::discover`]. It stays available after
    /// the session is closed.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::NotDiscovered` when discovery has not run.
    pub fn directory(&self) -> Result<&ServiceDirectory, DiscoveryError> {
        self.directory
            .as_ref()
            .ok_or(DiscoveryError::NotDiscovered { state: self.state })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Project whose containers are discovered.
    #[must_use]
    pub const fn project(&self) -> &ProjectName {
        &self.project
    }

    /// Address recorded as every service's `ip_address`.
    #[must_use]
    pub const fn host_address(&self) -> &str {
        self.host_address.as_str()
    }
}

impl<C: ContainerLister> Drop for Discovery<C> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<C: ContainerLister> fmt::Debug for Discovery<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery")
            .field("project", &self.project)
            .field("host_address", &self.host_address)
            .field("state", &self.state)
            .field("services", &self.directory.as_ref().map(ServiceDirectory::len))
            .finish_non_exhaustive()
    }
}
