//! Hash manifest: logical name → written file name.
//!
//! Targets record into a [`ManifestAccumulator`] while they run; the
//! pipeline flushes it once through [`ManifestStore::merge`], which folds the
//! new entries into whatever is already on disk.

mod store;

pub use store::ManifestStore;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered logical → hashed mapping, serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, String>);

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, logical: impl Into<String>, written: impl Into<String>) {
        self.0.insert(logical.into(), written.into());
    }

    #[cfg(test)]
    pub fn get(&self, logical: &str) -> Option<&str> {
        self.0.get(logical).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other`; its entries win.
    pub fn overlay(&mut self, other: &Manifest) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Keep only entries whose written name satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }
}

/// Entries recorded by the targets of one invocation.
///
/// Shared by reference between concurrently running targets.
#[derive(Debug, Default)]
pub struct ManifestAccumulator {
    entries: Mutex<Manifest>,
}

impl ManifestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, logical: impl Into<String>, written: impl Into<String>) {
        self.entries.lock().insert(logical, written);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Manifest {
        self.entries.lock().clone()
    }
}
