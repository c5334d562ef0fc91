//! Change detection and incremental tailing engine.
//!
//! Every poll runs one [`WatchCycle`]:
//!
//! - [`DirectoryScanner`] lists the files in the watched directory that
//!   match the extension filter
//! - [`ChangeDetector`] diffs that list against the [`WatchRegistry`],
//!   registering new files and dropping missing ones
//! - [`IncrementalReader`] reads whatever was appended to each tracked file
//!   since the last cycle and reports lines containing the marker string
//!
//! # Usage
//!
//! ```no_run
//! use dirwatch::watch::{DirectoryScanner, IncrementalReader, WatchCycle};
//! use std::path::PathBuf;
//!
//! let scanner = DirectoryScanner::new(PathBuf::from("/var/log/app"), ".log");
//! let mut cycle = WatchCycle::new(scanner, IncrementalReader::new("ERROR"));
//!
//! for event in cycle.run().events {
//!     println!("{event}");
//! }
//! ```

pub mod cycle;
pub mod detector;
pub mod error;
pub mod event;
pub mod reader;
pub mod record;
pub mod registry;
pub mod scanner;

pub use cycle::{CycleReport, WatchCycle};
pub use detector::{ChangeDetector, ChangeSet};
pub use error::{WatchError, WatchResult};
pub use event::WatchEvent;
pub use reader::{IncrementalReader, MarkerMatch, ReadOutcome};
pub use record::FileRecord;
pub use registry::WatchRegistry;
pub use scanner::DirectoryScanner;
