//! Command-line interface definitions for dirwatch.
//!
//! The CLI definitions are shared between the main binary and build tools
//! (like xtask) for man page generation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::config::Overrides;
use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for dirwatch.
#[derive(Parser, Debug)]
#[command(
    name = "dirwatch",
    version = crate::VERSION,
    about = "Watch a directory and report lines containing a magic string",
    long_about = "Polls a directory on a fixed interval, tails every file matching an \
                  extension filter, and reports each newly appended line that contains \
                  the magic string along with its line number. Files appearing and \
                  disappearing between polls are reported too."
)]
pub struct Cli {
    /// String to look for in appended lines (case-sensitive)
    #[arg(env = "DIRWATCH_MAGIC")]
    pub magic: Option<String>,

    /// Directory to monitor [default: current directory]
    #[arg(short, long, env = "DIRWATCH_DIR")]
    pub dir: Option<PathBuf>,

    /// File name suffix filter, matched exactly [default: txt]
    #[arg(short, long, env = "DIRWATCH_EXT")]
    pub ext: Option<String>,

    /// Seconds between polls [default: 5]
    #[arg(
        short,
        long,
        alias = "int",
        env = "DIRWATCH_INTERVAL",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: Option<u64>,

    /// Configuration file [default: ~/.config/dirwatch/config.toml]
    #[arg(short, long, env = "DIRWATCH_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Run a single poll and exit
    #[arg(long)]
    pub once: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Values that override the configuration file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            directory: self.dir.clone(),
            extension: self.ext.clone(),
            magic: self.magic.clone(),
            interval_secs: self.interval,
        }
    }
}
