//! Events produced by a watch cycle.

use super::error::WatchError;
use std::fmt;
use std::path::{Path, PathBuf};

/// One observable outcome of a cycle.
#[derive(Debug)]
pub enum WatchEvent {
    /// A matching file appeared in the directory.
    FileAdded {
        /// File that appeared
        path: PathBuf,
    },

    /// A tracked file is no longer in the directory.
    FileRemoved {
        /// File that disappeared
        path: PathBuf,
    },

    /// A line containing the marker string was consumed.
    MagicStringFound {
        /// File the line belongs to
        path: PathBuf,
        /// 1-based line number counted from the start of the file
        line_number: u64,
        /// The line's text, without its line terminator
        text: String,
    },

    /// A scan or a single file read failed this cycle.
    CycleError {
        /// The failure, carrying the directory or file it concerns
        error: WatchError,
    },
}

impl WatchEvent {
    /// Path of the file or directory the event concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::FileAdded { path }
            | Self::FileRemoved { path }
            | Self::MagicStringFound { path, .. } => path,
            Self::CycleError { error } => error.path(),
        }
    }

    /// Short lowercase label, used as the verb in console output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FileAdded { .. } => "added",
            Self::FileRemoved { .. } => "removed",
            Self::MagicStringFound { .. } => "found",
            Self::CycleError { .. } => "error",
        }
    }
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileAdded { path } => write!(f, "file added: {}", path.display()),
            Self::FileRemoved { path } => write!(f, "file removed: {}", path.display()),
            Self::MagicStringFound {
                path, line_number, ..
            } => write!(
                f,
                "magic string found: {} line {line_number}",
                path.display()
            ),
            Self::CycleError { error } => write!(f, "{error}"),
        }
    }
}

impl From<WatchError> for WatchEvent {
    fn from(error: WatchError) -> Self {
        Self::CycleError { error }
    }
}
