//! Building a service directory from a container listing.

use tracing::debug;

use super::directory::{Protocol, ServiceDirectory, ServiceKey, ServicePort};
use super::project::ProjectName;
use crate::engine::{ContainerLister, ContainerRecord, EngineConnector, PortMapping};
use crate::error::DockerlinkError;

/// Label naming the compose project a container belongs to.
pub const PROJECT_LABEL: &str = "com.docker.compose.project";

/// Label naming the compose service a container runs.
pub const SERVICE_LABEL: &str = "com.docker.compose.service";

/// Why a container contributed nothing to the directory.
#[derive(Debug, thiserror::Error)]
enum Skip {
    #[error("container has no labels")]
    NoLabels,
    #[error("container lacks the {0} label")]
    MissingLabel(&'static str),
    #[error("container belongs to project {0}")]
    OtherProject(String),
    #[error("container reports no ports")]
    NoPorts,
    #[error("port mapping lacks its {0}")]
    IncompletePort(&'static str),
}

/// List running containers and build the directory for `project`.
///
/// Containers of other projects and containers with incomplete metadata are
/// skipped with a debug log. Ports with a protocol other than TCP or UDP are
/// skipped individually.
///
/// # Errors
///
/// Returns `ContainerError::ListFailed` when the engine cannot list
/// containers.
pub async fn collect_services<L: ContainerLister + ?Sized>(
    lister: &L,
    project: &ProjectName,
    host_address: &str,
) -> Result<ServiceDirectory, DockerlinkError> {
    let containers = EngineConnector::list_containers_async(lister).await?;
    debug!(count = containers.len(), %project, "listed containers");
    Ok(build_directory(&containers, project, host_address))
}

/// Build the directory from an already fetched listing.
#[must_use]
pub fn build_directory(
    containers: &[ContainerRecord],
    project: &ProjectName,
    host_address: &str,
) -> ServiceDirectory {
    let mut directory = ServiceDirectory::new();
    for container in containers {
        match container_entries(container, project, host_address) {
            Ok(entries) => {
                for (key, port) in entries {
                    directory.insert(key, port);
                }
            }
            Err(reason) => {
                debug!(container = container.display_id(), %reason, "skipping container");
            }
        }
    }
    directory
}

fn container_entries(
    container: &ContainerRecord,
    project: &ProjectName,
    host_address: &str,
) -> Result<Vec<(ServiceKey, ServicePort)>, Skip> {
    let labels = container.labels.as_ref().ok_or(Skip::NoLabels)?;
    let container_project = labels
        .get(PROJECT_LABEL)
        .ok_or(Skip::MissingLabel(PROJECT_LABEL))?;
    if container_project != project.as_str() {
        return Err(Skip::OtherProject(container_project.clone()));
    }
    let service = labels
        .get(SERVICE_LABEL)
        .ok_or(Skip::MissingLabel(SERVICE_LABEL))?;
    let ports = container.ports.as_ref().ok_or(Skip::NoPorts)?;

    let mut entries = Vec::with_capacity(ports.len());
    for mapping in ports {
        let (protocol_text, private_port, public_port) = complete_mapping(mapping)?;
        match protocol_text.parse::<Protocol>() {
            Ok(protocol) => entries.push((
                ServiceKey::new(service.as_str(), private_port),
                ServicePort {
                    protocol,
                    ip_address: String::from(host_address),
                    public_port,
                    private_port,
                },
            )),
            Err(error) => {
                debug!(
                    container = container.display_id(),
                    %service,
                    private_port,
                    %error,
                    "skipping port"
                );
            }
        }
    }
    Ok(entries)
}

fn complete_mapping(mapping: &PortMapping) -> Result<(&str, u16, u16), Skip> {
    let protocol = mapping
        .protocol
        .as_deref()
        .ok_or(Skip::IncompletePort("protocol"))?;
    let private_port = mapping
        .private_port
        .ok_or(Skip::IncompletePort("private port"))?;
    let public_port = mapping
        .public_port
        .ok_or(Skip::IncompletePort("public port"))?;
    Ok((protocol, private_port, public_port))
}
