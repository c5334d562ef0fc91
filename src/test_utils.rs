#[cfg(test)]
pub mod fixtures {
    use anyhow::Result;
    use filetime::FileTime;
    use std::cell::Cell;
    use std::fs::{self, OpenOptions};
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::time::SystemTime;
    use tempfile::TempDir;

    /// A temporary watched directory whose writes get strictly increasing
    /// modification times, so change detection never depends on how coarse
    /// the filesystem's mtime resolution is.
    pub struct WatchDir {
        pub temp_dir: TempDir,
        clock: Cell<i64>,
    }

    impl WatchDir {
        pub fn new() -> Result<Self> {
            Ok(Self {
                temp_dir: tempfile::tempdir()?,
                clock: Cell::new(1_600_000_000),
            })
        }

        pub fn path(&self) -> &Path {
            self.temp_dir.path()
        }

        pub fn file(&self, name: &str) -> PathBuf {
            self.temp_dir.path().join(name)
        }

        /// Create or replace `name` with `content`
        pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
            let path = self.file(name);
            fs::write(&path, content)?;
            self.touch(&path)?;
            Ok(path)
        }

        /// Append `content` to `name`, creating it if needed
        pub fn append(&self, name: &str, content: &str) -> Result<PathBuf> {
            let path = self.file(name);
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(content.as_bytes())?;
            drop(file);
            self.touch(&path)?;
            Ok(path)
        }

        pub fn modified(&self, path: &Path) -> Result<SystemTime> {
            Ok(fs::metadata(path)?.modified()?)
        }

        fn touch(&self, path: &Path) -> Result<()> {
            let next = self.clock.get() + 1;
            self.clock.set(next);
            filetime::set_file_mtime(path, FileTime::from_unix_time(next, 0))?;
            Ok(())
        }
    }
}
