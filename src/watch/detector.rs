//! Directory diffing: which files appeared and which went away.

use super::event::WatchEvent;
use super::record::FileRecord;
use super::registry::WatchRegistry;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Result of diffing one scan against the registry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files registered by this diff
    pub added: Vec<PathBuf>,
    /// Files dropped from the registry by this diff
    pub removed: Vec<PathBuf>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Convert into events, additions first.
    #[must_use]
    pub fn into_events(self) -> Vec<WatchEvent> {
        self.added
            .into_iter()
            .map(|path| WatchEvent::FileAdded { path })
            .chain(
                self.removed
                    .into_iter()
                    .map(|path| WatchEvent::FileRemoved { path }),
            )
            .collect()
    }
}

/// Applies a directory snapshot to a [`WatchRegistry`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ChangeDetector;

impl ChangeDetector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Register new candidates and drop identities missing from `candidates`.
    ///
    /// Files already tracked are left untouched; updating them is the
    /// reader's job. Applying the same snapshot twice yields an empty
    /// [`ChangeSet`] the second time.
    pub fn apply(&self, candidates: &BTreeSet<PathBuf>, registry: &mut WatchRegistry) -> ChangeSet {
        let mut changes = ChangeSet::default();

        for path in candidates {
            if registry.contains(path) {
                continue;
            }
            registry.insert(FileRecord::new(path.clone(), modified_or_epoch(path)));
            debug!(path = %path.display(), "Tracking new file");
            changes.added.push(path.clone());
        }

        for identity in registry.paths() {
            if candidates.contains(&identity) {
                continue;
            }
            registry.remove(&identity);
            debug!(path = %identity.display(), "Dropped missing file");
            changes.removed.push(identity);
        }

        changes
    }
}

/// Modification time of `path`, or the epoch if it cannot be read.
///
/// New records are read once whatever their stored mtime is, and a file
/// that vanished in between is reported by the reader.
fn modified_or_epoch(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
