//! Assertion helpers for environment snapshot behavioural tests.

use dockerlink::environment::{EnvStore, MemoryEnv};
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::SnapshotState;

#[then("the test saw {name} as {expected}")]
fn test_saw_value(snapshot_state: &SnapshotState, name: String, expected: String) -> StepResult<()> {
    let during = env_during(snapshot_state)?;
    match during.var(&name) {
        Some(actual) if actual == expected => Ok(()),
        other => Err(format!("expected {name}={expected} during the test, got {other:?}")),
    }
}

#[then("the test saw {name} unset")]
fn test_saw_unset(snapshot_state: &SnapshotState, name: String) -> StepResult<()> {
    let during = env_during(snapshot_state)?;
    match during.var(&name) {
        None => Ok(()),
        Some(actual) => Err(format!("expected {name} to be unset, got {actual}")),
    }
}

#[then("{name} is restored to {expected}")]
fn restored_to(snapshot_state: &SnapshotState, name: String, expected: String) -> StepResult<()> {
    let after = env_after(snapshot_state)?;
    match after.var(&name) {
        Some(actual) if actual == expected => Ok(()),
        other => Err(format!("expected {name}={expected} after the test, got {other:?}")),
    }
}

#[then("{name} is removed")]
fn removed(snapshot_state: &SnapshotState, name: String) -> StepResult<()> {
    let after = env_after(snapshot_state)?;
    match after.var(&name) {
        None => Ok(()),
        Some(actual) => Err(format!("expected {name} to be removed, got {actual}")),
    }
}

fn env_during(snapshot_state: &SnapshotState) -> StepResult<MemoryEnv> {
    snapshot_state
        .during
        .get()
        .ok_or_else(|| String::from("the test should have ended"))
}

fn env_after(snapshot_state: &SnapshotState) -> StepResult<MemoryEnv> {
    snapshot_state
        .after
        .get()
        .ok_or_else(|| String::from("the test should have ended"))
}
