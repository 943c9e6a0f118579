//! Scoped environment variable snapshots.
//!
//! [`EnvSnapshot`] records the original value of every variable it mutates
//! and writes those originals back when the scope ends. Tests that set
//! variables through a snapshot cannot leak them into later tests, even when
//! the test body panics, because restoration is bound to `Drop`.
//!
//! The environment itself is reached through the [`EnvStore`] trait so the
//! same bookkeeping works against the real process environment
//! ([`ProcessEnv`]) or an in-memory map ([`MemoryEnv`]).

use std::collections::{BTreeMap, HashMap};
use std::ffi::{OsStr, OsString};
use std::fmt::Display;

use tracing::debug;

/// Read and write access to a set of environment variables.
pub trait EnvStore {
    /// Return the current value of `name`, if set and valid UTF-8.
    fn var(&self, name: &str) -> Option<String>;

    /// Return the raw value of `name`, if set, whatever its encoding.
    ///
    /// Snapshots record originals through this method so that values which
    /// are not valid UTF-8 are restored unchanged.
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.var(name).map(OsString::from)
    }

    /// Set `name` to `value`.
    fn set_var(&mut self, name: &str, value: &str);

    /// Set `name` to a raw value.
    fn set_var_os(&mut self, name: &str, value: &OsStr) {
        self.set_var(name, &value.to_string_lossy());
    }

    /// Remove `name` if present.
    fn remove_var(&mut self, name: &str);
}

impl<S: EnvStore + ?Sized> EnvStore for &mut S {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }

    fn var_os(&self, name: &str) -> Option<OsString> {
        (**self).var_os(name)
    }

    fn set_var(&mut self, name: &str, value: &str) {
        (**self).set_var(name, value);
    }

    fn set_var_os(&mut self, name: &str, value: &OsStr) {
        (**self).set_var_os(name, value);
    }

    fn remove_var(&mut self, name: &str) {
        (**self).remove_var(name);
    }
}

/// The environment of the running process.
///
/// Writes go through `std::env::set_var`, which is process-global and not
/// synchronised with other threads. Callers must not mutate the environment
/// from several threads at once; test suites that use this store should run
/// such tests serially.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn var_os(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }

    fn set_var(&mut self, name: &str, value: &str) {
        self.set_var_os(name, OsStr::new(value));
    }

    fn set_var_os(&mut self, name: &str, value: &OsStr) {
        // SAFETY: environment mutation is confined to the single thread that
        // owns the snapshot, per the `ProcessEnv` usage contract.
        unsafe {
            std::env::set_var(name, value);
        }
    }

    fn remove_var(&mut self, name: &str) {
        // SAFETY: see `set_var`.
        unsafe {
            std::env::remove_var(name);
        }
    }
}

/// An in-memory environment, used to preview projections without touching
/// the process environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    /// Create an empty environment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Return all variables in name order.
    #[must_use]
    pub const fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvStore for MemoryEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(String::from(name), String::from(value));
    }

    fn remove_var(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

/// Records and restores environment mutations for one scope.
///
/// The first mutation of a name within the scope records the value the
/// variable had beforehand (`None` when it was unset). Later mutations of
/// the same name leave that record untouched, so [`restore`](Self::restore)
/// always returns to the pre-scope state.
#[derive(Debug)]
pub struct EnvSnapshot<S: EnvStore = ProcessEnv> {
    store: S,
    originals: HashMap<String, Option<OsString>>,
}

impl EnvSnapshot<ProcessEnv> {
    /// Create a snapshot over the process environment.
    #[must_use]
    pub fn process() -> Self {
        Self::new(ProcessEnv)
    }
}

impl<S: EnvStore> EnvSnapshot<S> {
    /// Create a snapshot over `store` with nothing recorded.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            originals: HashMap::new(),
        }
    }

    /// Return the current value of `name`, or `default` when unset.
    #[must_use]
    pub fn get(&self, name: &str, default: Option<&str>) -> Option<String> {
        self.store
            .var(name)
            .or_else(|| default.map(String::from))
    }

    /// Set `name` to the string form of `value`, recording the prior value on
    /// first mutation.
    pub fn set(&mut self, name: &str, value: impl Display) {
        self.record(name);
        let rendered = value.to_string();
        debug!(name, value = %rendered, "setting environment variable");
        self.store.set_var(name, &rendered);
    }

    /// Remove `name`, recording the prior value on first mutation.
    pub fn unset(&mut self, name: &str) {
        self.record(name);
        debug!(name, "clearing environment variable");
        self.store.remove_var(name);
    }

    /// Write every recorded original back and forget the records.
    ///
    /// Calling this more than once is harmless: the second call finds nothing
    /// recorded.
    pub fn restore(&mut self) {
        for (name, original) in self.originals.drain() {
            match original {
                Some(value) => self.store.set_var_os(&name, &value),
                None => self.store.remove_var(&name),
            }
        }
    }

    /// End the scope keeping every mutation in place.
    pub fn commit(mut self) {
        self.originals.clear();
    }

    /// Return whether `name` has been mutated in this scope.
    #[must_use]
    pub fn is_recorded(&self, name: &str) -> bool {
        self.originals.contains_key(name)
    }

    /// Return the number of distinct names mutated in this scope.
    #[must_use]
    pub fn recorded_len(&self) -> usize {
        self.originals.len()
    }

    /// Borrow the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn record(&mut self, name: &str) {
        if !self.originals.contains_key(name) {
            let original = self.store.var_os(name);
            self.originals.insert(String::from(name), original);
        }
    }
}

impl<S: EnvStore> Drop for EnvSnapshot<S> {
    fn drop(&mut self) {
        self.restore();
    }
}
