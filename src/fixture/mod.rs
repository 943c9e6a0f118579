//! Suite and per-test fixtures.
//!
//! A [`ComposeSuite`] discovers services once when a test suite starts. Each
//! test then opens a [`TestScope`], which installs the link variables for
//! every discovered service and restores the environment when the scope
//! ends, including when the test panics.
//!
//! ```no_run
//! use dockerlink::config::AppConfig;
//! use dockerlink::fixture::ComposeSuite;
//!
//! # fn main() -> dockerlink::error::Result<()> {
//! let suite = ComposeSuite::set_up(&AppConfig::default())?;
//! suite.run_test(|scope| {
//!     let url = scope.get("POSTGRES_PORT_5432_TCP", None);
//!     assert!(url.is_some());
//! });
//! # Ok(())
//! # }
//! ```


use std::fmt::Display;

use bollard::Docker;
use tracing::debug;

use crate::config::AppConfig;
use crate::discovery::{Discovery, DiscoveryState, ServiceDirectory};
use crate::engine::ContainerLister;
use crate::environment::{EnvSnapshot, EnvStore, ProcessEnv};
use crate::error::DockerlinkError;
use crate::injector::{Injector, LinkProjector, ServiceProjector};

/// Services discovered for a test suite, plus the session that found them.
pub struct ComposeSuite<C: ContainerLister = Docker, P: ServiceProjector = LinkProjector> {
    discovery: Discovery<C>,
    directory: ServiceDirectory,
    projector: P,
}

impl ComposeSuite {
    /// Connect to the engine and discover the current project's services.
    ///
    /// # Errors
    ///
    /// Returns the connection or listing error. When listing fails after the
    /// connection was made, the session is closed first.
    pub fn set_up(config: &AppConfig) -> Result<Self, DockerlinkError> {
        let discovery = Discovery::connect(config)?;
        Self::discover_with(discovery)
    }
}

impl<C: ContainerLister> ComposeSuite<C> {
    /// Run discovery on a connected session and wrap the result.
    ///
    /// # Errors
    ///
    /// Returns the discovery error after closing the session.
    pub fn discover_with(mut discovery: Discovery<C>) -> Result<Self, DockerlinkError> {
        let discovered = discovery.discover().cloned();
        let directory = match discovered {
            Ok(directory) => directory,
            Err(error) => {
                discovery.close();
                return Err(error);
            }
        };
        Ok(Self {
            discovery,
            directory,
            projector: LinkProjector,
        })
    }

    /// Wrap a session on which discovery already ran.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::NotDiscovered` when the session has no
    /// directory yet.
    pub fn from_discovery(discovery: Discovery<C>) -> Result<Self, DockerlinkError> {
        let directory = discovery.directory()?.clone();
        Ok(Self {
            discovery,
            directory,
            projector: LinkProjector,
        })
    }
}

impl<C: ContainerLister, P: ServiceProjector> ComposeSuite<C, P> {
    /// Replace the projector used by later scopes.
    #[must_use]
    pub fn with_projector<Q: ServiceProjector>(self, projector: Q) -> ComposeSuite<C, Q> {
        ComposeSuite {
            discovery: self.discovery,
            directory: self.directory,
            projector,
        }
    }

    /// Open a scope over the process environment with every service
    /// installed.
    #[must_use]
    pub fn begin_test(&self) -> TestScope<ProcessEnv> {
        self.begin_test_with(ProcessEnv)
    }

    /// Open a scope over `store` with every service installed.
    #[must_use]
    pub fn begin_test_with<S: EnvStore>(&self, store: S) -> TestScope<S> {
        let mut snapshot = EnvSnapshot::new(store);
        Injector::with_projector(&self.directory, &self.projector).install(&mut snapshot);
        debug!(
            variables = snapshot.recorded_len(),
            "installed service environment"
        );
        TestScope { snapshot }
    }

    /// Run `body` inside a scope over the process environment.
    ///
    /// The environment is restored however `body` exits, panics included.
    pub fn run_test<R>(&self, body: impl FnOnce(&mut TestScope<ProcessEnv>) -> R) -> R {
        let mut scope = self.begin_test();
        body(&mut scope)
    }

    /// Run `body` inside a scope over `store`.
    pub fn run_test_with<S: EnvStore, R>(
        &self,
        store: S,
        body: impl FnOnce(&mut TestScope<S>) -> R,
    ) -> R {
        let mut scope = self.begin_test_with(store);
        body(&mut scope)
    }

    /// Release the engine session. The directory stays usable.
    pub fn tear_down(&mut self) {
        self.discovery.close();
    }

    /// Services discovered at set-up.
    #[must_use]
    pub const fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }

    /// State of the underlying discovery session.
    #[must_use]
    pub const fn state(&self) -> DiscoveryState {
        self.discovery.state()
    }

    /// The discovery session.
    #[must_use]
    pub const fn discovery(&self) -> &Discovery<C> {
        &self.discovery
    }
}

/// Environment access for one test.
///
/// Everything the scope installed or changed is restored on
/// [`finish`](Self::finish) or when the scope is dropped.
#[derive(Debug)]
pub struct TestScope<S: EnvStore = ProcessEnv> {
    snapshot: EnvSnapshot<S>,
}

impl<S: EnvStore> TestScope<S> {
    /// Return the current value of `name`, or `default` when unset.
    #[must_use]
    pub fn get(&self, name: &str, default: Option<&str>) -> Option<String> {
        self.snapshot.get(name, default)
    }

    /// Set `name` for the rest of the scope.
    pub fn set(&mut self, name: &str, value: impl Display) {
        self.snapshot.set(name, value);
    }

    /// Unset `name` for the rest of the scope.
    pub fn unset(&mut self, name: &str) {
        self.snapshot.unset(name);
    }

    /// The snapshot backing this scope.
    #[must_use]
    pub const fn snapshot(&self) -> &EnvSnapshot<S> {
        &self.snapshot
    }

    /// Restore the environment and end the scope.
    pub fn finish(mut self) {
        self.snapshot.restore();
    }
}
