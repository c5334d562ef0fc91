//! The set of files currently being tracked.

use super::record::FileRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Map from file identity to its [`FileRecord`].
///
/// Owned by a single [`WatchCycle`](super::WatchCycle); nothing else holds
/// references into it. Keys are kept sorted so every pass over the registry
/// visits files in the same order.
#[derive(Debug, Default, Clone)]
pub struct WatchRegistry {
    /// Tracked records keyed by absolute path
    records: BTreeMap<PathBuf, FileRecord>,
}

impl WatchRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a file. Returns the previous record if the identity was
    /// already present.
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        self.records.insert(record.identity().to_path_buf(), record)
    }

    /// Stop tracking a file.
    pub fn remove(&mut self, identity: &Path) -> Option<FileRecord> {
        self.records.remove(identity)
    }

    #[must_use]
    pub fn get(&self, identity: &Path) -> Option<&FileRecord> {
        self.records.get(identity)
    }

    pub fn get_mut(&mut self, identity: &Path) -> Option<&mut FileRecord> {
        self.records.get_mut(identity)
    }

    #[must_use]
    pub fn contains(&self, identity: &Path) -> bool {
        self.records.contains_key(identity)
    }

    /// Snapshot of every tracked identity, in sorted order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.records.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
