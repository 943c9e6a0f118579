//! Step definitions for environment snapshot behavioural tests.

use std::panic::{AssertUnwindSafe, catch_unwind};

use dockerlink::environment::{EnvSnapshot, EnvStore, MemoryEnv};
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{Mutation, SnapshotState};

#[given("the environment has {name} set to {value}")]
fn given_variable(snapshot_state: &SnapshotState, name: String, value: String) -> StepResult<()> {
    let mut env = snapshot_state
        .initial
        .get()
        .ok_or_else(|| String::from("initial environment should be set"))?;
    env.set_var(&name, &value);
    snapshot_state.initial.set(env);
    Ok(())
}

#[when("the test sets {name} to {value}")]
fn when_test_sets(snapshot_state: &SnapshotState, name: String, value: String) -> StepResult<()> {
    queue(snapshot_state, Mutation::Set { name, value })
}

#[when("the test unsets {name}")]
fn when_test_unsets(snapshot_state: &SnapshotState, name: String) -> StepResult<()> {
    queue(snapshot_state, Mutation::Unset { name })
}

#[when("the test ends")]
fn when_test_ends(snapshot_state: &SnapshotState) -> StepResult<()> {
    let mutations = queued(snapshot_state)?;
    let mut env = initial(snapshot_state)?;
    {
        let mut snapshot = EnvSnapshot::new(&mut env);
        apply(&mut snapshot, &mutations);
        snapshot_state
            .during
            .set(MemoryEnv::clone(snapshot.store()));
        snapshot.restore();
    }
    snapshot_state.after.set(env);
    Ok(())
}

#[when("the test fails")]
fn when_test_fails(snapshot_state: &SnapshotState) -> StepResult<()> {
    let mutations = queued(snapshot_state)?;
    let mut env = initial(snapshot_state)?;

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut snapshot = EnvSnapshot::new(&mut env);
        apply(&mut snapshot, &mutations);
        assert!(mutations.is_empty(), "simulated test failure");
    }));
    if outcome.is_ok() {
        return Err(String::from("test body should have panicked"));
    }

    snapshot_state.after.set(env);
    Ok(())
}

fn queue(snapshot_state: &SnapshotState, mutation: Mutation) -> StepResult<()> {
    let mut mutations = queued(snapshot_state)?;
    mutations.push(mutation);
    snapshot_state.mutations.set(mutations);
    Ok(())
}

fn queued(snapshot_state: &SnapshotState) -> StepResult<Vec<Mutation>> {
    snapshot_state
        .mutations
        .get()
        .ok_or_else(|| String::from("mutations should be initialised"))
}

fn initial(snapshot_state: &SnapshotState) -> StepResult<MemoryEnv> {
    snapshot_state
        .initial
        .get()
        .ok_or_else(|| String::from("initial environment should be set"))
}

fn apply<S: EnvStore>(snapshot: &mut EnvSnapshot<S>, mutations: &[Mutation]) {
    for mutation in mutations {
        match mutation {
            Mutation::Set { name, value } => snapshot.set(name, value),
            Mutation::Unset { name } => snapshot.unset(name),
        }
    }
}
