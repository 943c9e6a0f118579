//! Step definitions for service discovery behavioural tests.

use dockerlink::api::link_environment;
use dockerlink::discovery::{Discovery, PROJECT_LABEL, ProjectName, SERVICE_LABEL};
use dockerlink::engine::{ContainerRecord, PortMapping};
use dockerlink::error::{ContainerError, DockerlinkError};
use dockerlink::injector::LinkProjector;
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{DiscoveryOutcome, ServiceDiscoveryState, StaticLister};

#[given("the compose project {project}")]
fn given_project(service_discovery_state: &ServiceDiscoveryState, project: String) {
    service_discovery_state.project.set(project);
}

#[given("the host address is {address}")]
fn given_host_address(service_discovery_state: &ServiceDiscoveryState, address: String) {
    service_discovery_state.host_address.set(address);
}

#[given("service {service} of project {project} publishes {protocol} port {private} on {public}")]
fn given_published_port(
    service_discovery_state: &ServiceDiscoveryState,
    service: String,
    project: String,
    protocol: String,
    private: u16,
    public: u16,
) -> StepResult<()> {
    let mut containers = service_discovery_state
        .containers
        .get()
        .ok_or_else(|| String::from("containers should be initialised"))?;
    let id = format!("{project}_{service}_{}", containers.len() + 1);
    containers.push(
        ContainerRecord::new(id)
            .with_label(PROJECT_LABEL, project)
            .with_label(SERVICE_LABEL, service)
            .with_port(PortMapping::published(&protocol, private, public)),
    );
    service_discovery_state.containers.set(containers);
    Ok(())
}

#[given("the engine fails to list containers")]
fn given_listing_fails(service_discovery_state: &ServiceDiscoveryState) {
    service_discovery_state.listing_fails.set(true);
}

#[when("services are discovered")]
fn when_discovered(service_discovery_state: &ServiceDiscoveryState) -> StepResult<()> {
    let mut discovery = session(service_discovery_state)?;
    let outcome = match discovery.discover() {
        Ok(directory) => DiscoveryOutcome::Found {
            directory: directory.clone(),
            env: link_environment(directory, &LinkProjector),
        },
        Err(DockerlinkError::Container(ContainerError::ListFailed { .. })) => {
            DiscoveryOutcome::ListFailed
        }
        Err(other) => DiscoveryOutcome::Failed(other.to_string()),
    };
    service_discovery_state.outcome.set(outcome);
    Ok(())
}

#[when("services are discovered twice on one session")]
fn when_discovered_twice(service_discovery_state: &ServiceDiscoveryState) -> StepResult<()> {
    let mut discovery = session(service_discovery_state)?;
    discovery
        .discover()
        .map_err(|e| format!("first discovery should succeed: {e}"))?;
    let second = discovery
        .discover()
        .map(|_| ())
        .err()
        .ok_or_else(|| String::from("second discovery should fail"))?;
    service_discovery_state.second_attempt.set(second.to_string());
    Ok(())
}

fn session(service_discovery_state: &ServiceDiscoveryState) -> StepResult<Discovery<StaticLister>> {
    let project = service_discovery_state
        .project
        .get()
        .ok_or_else(|| String::from("project should be configured"))?;
    let host_address = service_discovery_state
        .host_address
        .get()
        .ok_or_else(|| String::from("host address should be configured"))?;
    let listing = if service_discovery_state.listing_fails.get().unwrap_or(false) {
        None
    } else {
        service_discovery_state.containers.get()
    };

    Discovery::from_client(
        StaticLister(listing),
        ProjectName::verbatim(project),
        host_address,
    )
    .map_err(|e| format!("failed to create session: {e}"))
}
