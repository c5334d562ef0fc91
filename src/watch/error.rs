//! Error taxonomy for the watch engine.
//!
//! Every variant is transient: a failed scan or read is reported for the
//! current cycle and retried on the next one. None of them terminate the
//! poll loop.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures raised while scanning the directory or reading a tracked file.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The watched directory could not be listed (missing, permission denied).
    #[error("directory unavailable: {}: {source}", path.display())]
    DirectoryUnavailable {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A file disappeared between the directory listing and the read.
    #[error("file vanished before it could be read: {}", path.display())]
    FileVanished {
        /// File that is gone
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A file exists but could not be opened, stat'ed or read.
    #[error("file unreadable: {}: {source}", path.display())]
    FileUnreadable {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl WatchError {
    /// Classify an I/O error hit while touching `path`.
    ///
    /// `NotFound` means the file went away under us; anything else is a
    /// plain read failure that will be retried next cycle.
    #[must_use]
    pub fn from_file_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::FileVanished {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::FileUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// The path this error is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryUnavailable { path, .. }
            | Self::FileVanished { path, .. }
            | Self::FileUnreadable { path, .. } => path,
        }
    }

    /// Whether this error concerns a single file rather than the whole cycle.
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        matches!(self, Self::FileVanished { .. } | Self::FileUnreadable { .. })
    }
}

/// Convenience alias for results produced by the watch engine.
pub type WatchResult<T> = std::result::Result<T, WatchError>;
