#![allow(dead_code)]

use anyhow::Result;
use dirwatch::watch::{CycleReport, DirectoryScanner, IncrementalReader, WatchCycle, WatchEvent};
use filetime::FileTime;
use std::cell::Cell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Watched directory fixture for consistent test setup
///
/// Every write bumps the file's mtime to a new, strictly larger value so the
/// reader's change detection is deterministic.
pub struct TestDir {
    pub temp_dir: TempDir,
    clock: Cell<i64>,
}

impl TestDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            clock: Cell::new(1_700_000_000),
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.file(name);
        fs::write(&path, content)?;
        self.touch(&path)?;
        Ok(path)
    }

    pub fn append(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.file(name);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(content.as_bytes())?;
        drop(file);
        self.touch(&path)?;
        Ok(path)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        fs::remove_file(self.file(name))?;
        Ok(())
    }

    /// A cycle over this directory watching `.log` files
    pub fn cycle(&self, marker: &str) -> WatchCycle {
        WatchCycle::new(
            DirectoryScanner::new(self.path().to_path_buf(), ".log"),
            IncrementalReader::new(marker),
        )
    }

    fn touch(&self, path: &Path) -> Result<()> {
        let next = self.clock.get() + 1;
        self.clock.set(next);
        filetime::set_file_mtime(path, FileTime::from_unix_time(next, 0))?;
        Ok(())
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new().expect("Failed to create test directory")
    }
}

/// Line numbers of every match in a report
pub fn match_lines(report: &CycleReport) -> Vec<u64> {
    report
        .events
        .iter()
        .filter_map(|e| match e {
            WatchEvent::MagicStringFound { line_number, .. } => Some(*line_number),
            _ => None,
        })
        .collect()
}

/// Event kinds of a report, in order
pub fn kinds(report: &CycleReport) -> Vec<&'static str> {
    report.events.iter().map(WatchEvent::kind).collect()
}
