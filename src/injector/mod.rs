//! Projection of discovered services into link environment variables.
//!
//! For a service `postgres` listening on TCP port 5432, published by the
//! engine host `192.168.99.100` on port 32768, the installed variables are:
//!
//! ```text
//! POSTGRES_PORT_5432_TCP=tcp://192.168.99.100:32768
//! POSTGRES_PORT_5432_TCP_ADDR=192.168.99.100
//! POSTGRES_PORT_5432_TCP_PORT=32768
//! POSTGRES_PORT_5432_TCP_PROTO=tcp
//! ```
//!
//! These match the variables the legacy container-link mechanism gave linked
//! containers, so code reading them works unchanged inside and outside
//! compose.


use std::collections::HashMap;

use tracing::{debug, warn};

use crate::discovery::{Protocol, ServiceDirectory};
use crate::environment::{EnvSnapshot, EnvStore};

/// One discovered service port, borrowed from a [`ServiceDirectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEndpoint<'a> {
    /// Compose service name.
    pub service: &'a str,
    /// Transport protocol.
    pub protocol: Protocol,
    /// Address of the engine host publishing the port.
    pub ip_address: &'a str,
    /// Host port routed to the service.
    pub public_port: u16,
    /// Port the service listens on inside its container.
    pub private_port: u16,
}

impl ServiceEndpoint<'_> {
    /// Prefix shared by the four link variables,
    /// `{NAME}_PORT_{PRIVPORT}_{PROTO}`.
    #[must_use]
    pub fn variable_prefix(&self) -> String {
        format!(
            "{}_PORT_{}_{}",
            env_name(self.service),
            self.private_port,
            self.protocol.upper()
        )
    }
}

/// Convert a service name into its variable-name form: uppercase, with every
/// character outside `[A-Za-z0-9_]` replaced by `_`.
///
/// The mapping is not injective: `web-api`, `web_api` and `Web-API` all map
/// to `WEB_API`. When two such services expose the same port and protocol,
/// [`Injector::install`] logs a warning and the service later in directory
/// order provides the variables.
#[must_use]
pub fn env_name(service: &str) -> String {
    service
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// The four link variables for one endpoint, in installation order.
#[must_use]
pub fn link_variables(endpoint: &ServiceEndpoint<'_>) -> [(String, String); 4] {
    let prefix = endpoint.variable_prefix();
    let proto = endpoint.protocol.as_str();
    [
        (
            prefix.clone(),
            format!(
                "{proto}://{}:{}",
                endpoint.ip_address, endpoint.public_port
            ),
        ),
        (format!("{prefix}_ADDR"), String::from(endpoint.ip_address)),
        (format!("{prefix}_PORT"), endpoint.public_port.to_string()),
        (format!("{prefix}_PROTO"), String::from(proto)),
    ]
}

/// Set the link variables for `endpoint` through `snapshot`.
pub fn install_link_variables<S: EnvStore>(
    snapshot: &mut EnvSnapshot<S>,
    endpoint: &ServiceEndpoint<'_>,
) {
    debug!(service = endpoint.service, "setting environment for service");
    for (name, value) in link_variables(endpoint) {
        snapshot.set(&name, value);
    }
}

/// Per-endpoint projection hook.
///
/// The provided method installs the link variables. Implementors that need
/// application-specific variables override it, usually calling
/// [`install_link_variables`] as well.
pub trait ServiceProjector {
    /// Project one endpoint into the environment.
    fn project<S: EnvStore>(&self, snapshot: &mut EnvSnapshot<S>, endpoint: &ServiceEndpoint<'_>) {
        install_link_variables(snapshot, endpoint);
    }
}

/// The projector that installs only the link variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkProjector;

impl ServiceProjector for LinkProjector {}

/// Installs every directory entry through a projector.
#[derive(Debug, Clone, Copy)]
pub struct Injector<'a, P: ServiceProjector = LinkProjector> {
    directory: &'a ServiceDirectory,
    projector: &'a P,
}

impl<'a> Injector<'a> {
    /// Create an injector using the link projector.
    #[must_use]
    pub const fn new(directory: &'a ServiceDirectory) -> Self {
        Self::with_projector(directory, &LinkProjector)
    }
}

impl<'a, P: ServiceProjector> Injector<'a, P> {
    /// Create an injector using a custom projector.
    #[must_use]
    pub const fn with_projector(directory: &'a ServiceDirectory, projector: &'a P) -> Self {
        Self {
            directory,
            projector,
        }
    }

    /// Project every entry, in directory order.
    ///
    /// Distinct services whose names map to the same variable prefix are
    /// reported with a warning; the later service overwrites the earlier.
    pub fn install<S: EnvStore>(&self, snapshot: &mut EnvSnapshot<S>) {
        let mut owners: HashMap<String, &str> = HashMap::new();
        for (key, port) in self.directory {
            let endpoint = ServiceEndpoint {
                service: &key.service,
                protocol: port.protocol,
                ip_address: &port.ip_address,
                public_port: port.public_port,
                private_port: port.private_port,
            };
            let prefix = endpoint.variable_prefix();
            if let Some(earlier) = owners.insert(prefix.clone(), endpoint.service) {
                warn!(
                    earlier,
                    later = endpoint.service,
                    %prefix,
                    "services map to the same variable names; the later one wins"
                );
            }
            self.projector.project(snapshot, &endpoint);
        }
    }
}
