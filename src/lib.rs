#![warn(missing_docs)]
#![allow(clippy::arithmetic_side_effects)] // Offsets and line counters are bounded by file sizes
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Dirwatch - Polling Tail-and-Grep Daemon
//!
//! Dirwatch polls a directory on a fixed interval, tracks every file whose
//! name ends with a configured suffix, and scans newly appended lines for a
//! magic string, reporting each occurrence with its line number. Files that
//! appear or disappear between polls are reported as well.
//!
//! ## Features
//!
//! - **Incremental reads**: each file is resumed from the byte offset where
//!   the previous poll stopped; nothing is scanned twice
//! - **Absolute line numbers**: line counts carry across reads, so a match
//!   found in the tenth poll reports the same line number a full read would
//! - **Partial lines wait**: a line without its terminator is read once the
//!   writer finishes it
//! - **Truncation recovery**: a file that shrinks is read again from the start
//! - **Polling only**: no inotify or platform event APIs
//!
//! ## Architecture
//!
//! - [`watch`]: scanner, change detector, incremental reader and the cycle
//!   that drives them
//! - [`daemon`]: the poll loop and the [`daemon::EventSink`] seam
//! - [`shutdown`]: cancellation token observed between polls
//! - [`config`]: configuration file loading, layering and validation
//! - [`output`]: console rendering and logging setup
//! - [`cli`]: command-line definitions
//!
//! ## Example Usage
//!
//! ```no_run
//! use dirwatch::daemon::Daemon;
//! use dirwatch::config::Config;
//! use dirwatch::shutdown::CancellationToken;
//! use dirwatch::watch::WatchEvent;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.watch.directory = Some("/var/log/app".into());
//! config.watch.magic = Some("ERROR".to_string());
//!
//! let token = CancellationToken::new();
//! let mut daemon = Daemon::from_settings(&config.settings()?, token.clone());
//! daemon.run(&mut |event: &WatchEvent| println!("{event}"));
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Configuration parsing, validation, and layering.
pub mod config;

/// Poll loop driving watch cycles until cancelled.
pub mod daemon;

/// Output formatting and logging setup.
pub mod output;

/// Cancellation shared between signal handlers and the poll loop.
pub mod shutdown;

/// Change detection and incremental tailing engine.
pub mod watch;

#[cfg(test)]
pub(crate) mod test_utils;

/// Current version of the dirwatch binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path relative to home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/dirwatch/config.toml";
