//! Directory scanner for discovering candidate files.
//!
//! The `DirectoryScanner` lists the watched directory (one level only) and
//! collects every regular file whose name ends with the configured suffix.

use super::error::{WatchError, WatchResult};
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Scanner for enumerating matching files in the watched directory
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    /// Directory to list
    directory: PathBuf,
    /// Suffix a file name must end with
    extension: String,
    /// Whether symlinks to files count as files
    follow_symlinks: bool,
}

impl DirectoryScanner {
    /// Create a new directory scanner
    ///
    /// # Arguments
    ///
    /// * `directory` - Directory to list; paths returned by [`scan`](Self::scan)
    ///   are this directory joined with the entry name
    /// * `extension` - Exact suffix to match against entry names (no globbing)
    #[must_use]
    pub fn new(directory: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            directory,
            extension: extension.into(),
            follow_symlinks: true,
        }
    }

    /// Treat symlinks as their own entries instead of following them.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// List the directory and return the paths of all matching files
    ///
    /// Subdirectories are never descended into. Entries that disappear or
    /// cannot be inspected while listing are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::DirectoryUnavailable`] if the directory is
    /// missing, is not a directory, or cannot be listed.
    pub fn scan(&self) -> WatchResult<BTreeSet<PathBuf>> {
        let unavailable = |source: io::Error| WatchError::DirectoryUnavailable {
            path: self.directory.clone(),
            source,
        };

        let metadata = std::fs::metadata(&self.directory).map_err(unavailable)?;
        if !metadata.is_dir() {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::NotADirectory,
                "watched path is not a directory",
            )));
        }

        let mut files = BTreeSet::new();

        for entry in WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_symlinks)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory walk failed"));
                    return Err(unavailable(source));
                }
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if entry.file_type().is_file() && self.matches(&name) {
                files.insert(entry.path().to_path_buf());
            }
        }

        trace!(
            directory = %self.directory.display(),
            count = files.len(),
            "Directory scanned"
        );

        Ok(files)
    }

    /// Check whether an entry name passes the extension filter
    fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(self.extension.as_str())
    }
}
