//! Assertion helpers for service discovery behavioural tests.

use dockerlink::environment::EnvStore;
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{DiscoveryOutcome, ServiceDiscoveryState};

#[then("the directory holds {count} entries")]
fn directory_holds(service_discovery_state: &ServiceDiscoveryState, count: usize) -> StepResult<()> {
    match outcome(service_discovery_state)? {
        DiscoveryOutcome::Found { directory, .. } if directory.len() == count => Ok(()),
        DiscoveryOutcome::Found { directory, .. } => Err(format!(
            "expected {count} entries, got {}",
            directory.len()
        )),
        other => Err(format!("expected a directory, got {other:?}")),
    }
}

#[then("the variable {name} equals {expected}")]
fn variable_equals(
    service_discovery_state: &ServiceDiscoveryState,
    name: String,
    expected: String,
) -> StepResult<()> {
    match outcome(service_discovery_state)? {
        DiscoveryOutcome::Found { env, .. } => match env.var(&name) {
            Some(actual) if actual == expected => Ok(()),
            other => Err(format!("expected {name}={expected}, got {other:?}")),
        },
        other => Err(format!("expected a directory, got {other:?}")),
    }
}

#[then("no variable {name} exists")]
fn variable_absent(service_discovery_state: &ServiceDiscoveryState, name: String) -> StepResult<()> {
    match outcome(service_discovery_state)? {
        DiscoveryOutcome::Found { env, .. } => env
            .var(&name)
            .map_or(Ok(()), |actual| Err(format!("expected no {name}, got {actual}"))),
        other => Err(format!("expected a directory, got {other:?}")),
    }
}

#[then("discovery fails with a listing error")]
fn fails_with_listing_error(service_discovery_state: &ServiceDiscoveryState) -> StepResult<()> {
    match outcome(service_discovery_state)? {
        DiscoveryOutcome::ListFailed => Ok(()),
        other => Err(format!("expected a listing error, got {other:?}")),
    }
}

#[then("the second discovery is rejected as already discovered")]
fn second_discovery_rejected(service_discovery_state: &ServiceDiscoveryState) -> StepResult<()> {
    let message = service_discovery_state
        .second_attempt
        .get()
        .ok_or_else(|| String::from("second attempt should be recorded"))?;
    if message.contains("already") {
        Ok(())
    } else {
        Err(format!("expected an already-discovered error, got: {message}"))
    }
}

fn outcome(service_discovery_state: &ServiceDiscoveryState) -> StepResult<DiscoveryOutcome> {
    service_discovery_state
        .outcome
        .get()
        .ok_or_else(|| String::from("discovery should have run"))
}
