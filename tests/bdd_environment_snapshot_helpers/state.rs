//! Scenario state for environment snapshot behavioural tests.

use dockerlink::environment::MemoryEnv;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// A mutation the test body performs inside its snapshot.
#[derive(Debug, Clone)]
pub(crate) enum Mutation {
    /// Set a variable to a value.
    Set { name: String, value: String },
    /// Remove a variable.
    Unset { name: String },
}

#[derive(Default, ScenarioState)]
pub(crate) struct SnapshotState {
    /// Environment as it was before the test started.
    pub(crate) initial: Slot<MemoryEnv>,
    /// Mutations queued by `When` steps, applied when the test ends.
    pub(crate) mutations: Slot<Vec<Mutation>>,
    /// Environment as the test body last saw it.
    pub(crate) during: Slot<MemoryEnv>,
    /// Environment after the snapshot was restored.
    pub(crate) after: Slot<MemoryEnv>,
}

#[fixture]
pub(crate) fn snapshot_state() -> SnapshotState {
    let state = SnapshotState::default();
    state.initial.set(MemoryEnv::new());
    state.mutations.set(Vec::new());
    state
}
