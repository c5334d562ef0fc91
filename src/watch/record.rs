//! Per-file tracked state.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Everything the engine remembers about one tracked file.
///
/// `byte_offset` always sits on a line boundary: bytes after it belong to a
/// line that has not been newline-terminated yet (or has not been read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path of the file; the registry key
    identity: PathBuf,
    /// Modification time observed at registration or at the last read
    pub last_modified: SystemTime,
    /// Next unread byte position
    pub byte_offset: u64,
    /// Newline-terminated lines consumed so far
    pub line_count: u64,
    /// True until the first successful read
    pub first_read: bool,
}

impl FileRecord {
    /// Create a record for a file seen for the first time.
    #[must_use]
    pub fn new(identity: PathBuf, last_modified: SystemTime) -> Self {
        Self {
            identity,
            last_modified,
            byte_offset: 0,
            line_count: 0,
            first_read: true,
        }
    }

    /// The file this record tracks.
    #[must_use]
    pub fn identity(&self) -> &Path {
        &self.identity
    }
}
