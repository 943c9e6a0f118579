//! Scenario state for service discovery behavioural tests.

use dockerlink::discovery::ServiceDirectory;
use dockerlink::engine::{ContainerLister, ContainerRecord, ListContainersFuture};
use dockerlink::environment::MemoryEnv;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Lister that replays a fixed listing, or fails when it has none.
pub(crate) struct StaticLister(pub(crate) Option<Vec<ContainerRecord>>);

impl ContainerLister for StaticLister {
    fn list_containers(&self) -> ListContainersFuture<'_> {
        let listing = self.0.clone();
        Box::pin(async move { listing.ok_or(bollard::errors::Error::RequestTimeoutError) })
    }
}

/// High-level outcome of a discovery run.
#[derive(Debug, Clone)]
pub(crate) enum DiscoveryOutcome {
    /// Discovery produced a directory and its link environment.
    Found {
        directory: ServiceDirectory,
        env: MemoryEnv,
    },
    /// Listing containers failed.
    ListFailed,
    /// Discovery failed for another reason.
    Failed(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct ServiceDiscoveryState {
    pub(crate) project: Slot<String>,
    pub(crate) host_address: Slot<String>,
    pub(crate) containers: Slot<Vec<ContainerRecord>>,
    pub(crate) listing_fails: Slot<bool>,
    pub(crate) outcome: Slot<DiscoveryOutcome>,
    pub(crate) second_attempt: Slot<String>,
}

#[fixture]
pub(crate) fn service_discovery_state() -> ServiceDiscoveryState {
    let state = ServiceDiscoveryState::default();
    state.containers.set(Vec::new());
    state.listing_fails.set(false);
    state
}
