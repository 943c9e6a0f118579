//! Container listing through a mockable engine seam.
//!
//! Discovery only needs each running container's labels and published
//! ports. [`ContainerLister`] narrows the engine client down to that single
//! call and converts `Bollard` summaries into [`ContainerRecord`] values, so
//! discovery logic can be exercised without a running daemon.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use bollard::Docker;
use bollard::models::ContainerSummary;
use bollard::query_parameters::ListContainersOptions;

use super::EngineConnector;
use crate::error::{ContainerError, DockerlinkError};

/// Boxed future type returned by [`ContainerLister`] implementors.
pub type ListContainersFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<ContainerRecord>, bollard::errors::Error>> + Send + 'a>>;

/// Behaviour required to list running containers via a backing engine
/// client.
pub trait ContainerLister {
    /// List the containers that are currently running.
    fn list_containers(&self) -> ListContainersFuture<'_>;
}

impl ContainerLister for Docker {
    fn list_containers(&self) -> ListContainersFuture<'_> {
        Box::pin(async move {
            let summaries = Self::list_containers(self, None::<ListContainersOptions>).await?;
            Ok(summaries.into_iter().map(ContainerRecord::from).collect())
        })
    }
}

/// One published (or merely exposed) port of a container.
///
/// Every field is optional because engines omit data for ports that are
/// exposed but not published to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortMapping {
    /// Transport protocol as reported by the engine, such as `tcp`.
    pub protocol: Option<String>,

    /// Port the process inside the container listens on.
    pub private_port: Option<u16>,

    /// Host port the engine routes to `private_port`.
    pub public_port: Option<u16>,
}

impl PortMapping {
    /// Build a fully-populated mapping.
    #[must_use]
    pub fn published(protocol: &str, private_port: u16, public_port: u16) -> Self {
        Self {
            protocol: Some(String::from(protocol)),
            private_port: Some(private_port),
            public_port: Some(public_port),
        }
    }
}

/// The subset of a container listing entry that discovery consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Engine-assigned container identifier.
    pub id: Option<String>,

    /// Container labels.
    pub labels: Option<HashMap<String, String>>,

    /// Port mappings.
    pub ports: Option<Vec<PortMapping>>,
}

impl ContainerRecord {
    /// Create a record with an identifier and no metadata.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            labels: None,
            ports: None,
        }
    }

    /// Add a label, creating the label map if needed.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add a port mapping, creating the port list if needed.
    #[must_use]
    pub fn with_port(mut self, port: PortMapping) -> Self {
        self.ports.get_or_insert_with(Vec::new).push(port);
        self
    }

    /// Return the identifier, or a placeholder for logging.
    #[must_use]
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<unknown>")
    }
}

impl From<ContainerSummary> for ContainerRecord {
    fn from(summary: ContainerSummary) -> Self {
        let ports = summary.ports.map(|ports| {
            ports
                .into_iter()
                .map(|port| PortMapping {
                    protocol: port
                        .typ
                        .as_ref()
                        .map(ToString::to_string)
                        .filter(|typ| !typ.is_empty()),
                    private_port: Some(port.private_port),
                    public_port: port.public_port,
                })
                .collect()
        });

        Self {
            id: summary.id,
            labels: summary.labels,
            ports,
        }
    }
}

impl EngineConnector {
    /// List running containers using a provided client abstraction.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ListFailed` when the engine rejects the
    /// request.
    pub async fn list_containers_async<L: ContainerLister + ?Sized>(
        lister: &L,
    ) -> Result<Vec<ContainerRecord>, DockerlinkError> {
        lister.list_containers().await.map_err(|error| {
            DockerlinkError::from(ContainerError::ListFailed {
                message: error.to_string(),
            })
        })
    }
}
