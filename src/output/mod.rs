//! Console output and logging setup for dirwatch.
//!
//! Matches are printed to stdout in a grep-like `path:line: text` form so the
//! daemon can be piped; everything else goes to stderr:
//! - Dimmed colors for routine messages
//! - Bold colors for warnings and errors
//! - Verbosity control (quiet, normal, verbose)

use crate::daemon::EventSink;
use crate::watch::WatchEvent;
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing_subscriber::EnvFilter;

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress informational messages, show only matches, warnings and errors.
    Quiet = 0,
    /// Default verbosity level, show all standard messages.
    Normal = 1,
    /// Show verbose debug messages in addition to standard output.
    Verbose = 2,
}

impl Verbosity {
    /// Pick the level from the `--verbose` / `--quiet` flags.
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints an informational message in dimmed color (respects quiet mode).
pub fn info(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Prints a git-style action message with dimmed verb and normal message.
pub fn action(verb: &str, message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{} {}", verb.dimmed().bold(), message);
}

/// Render a match as `path:line: text`.
#[must_use]
pub fn format_match(path: &std::path::Path, line_number: u64, text: &str) -> String {
    format!(
        "{}:{}: {}",
        path.display().to_string().magenta(),
        line_number.to_string().green(),
        text
    )
}

/// Event sink that prints events for an operator watching the terminal.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn handle(&mut self, event: &WatchEvent) {
        match event {
            WatchEvent::FileAdded { path } => action("added", &path.display().to_string()),
            WatchEvent::FileRemoved { path } => action("removed", &path.display().to_string()),
            WatchEvent::MagicStringFound {
                path,
                line_number,
                text,
            } => {
                let mut stdout = std::io::stdout().lock();
                // A closed stdout (e.g. `| head`) must not take the watcher down
                let _ = writeln!(stdout, "{}", format_match(path, *line_number, text));
                let _ = stdout.flush();
            }
            WatchEvent::CycleError { error } => warning(&format!("warning: {error}")),
        }
    }
}

/// Install the global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used.
///
/// # Errors
///
/// Returns an error if the directive cannot be parsed or a subscriber is
/// already installed.
pub fn init_logging(default_directive: &str, ansi: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

/// Pick the tracing directive for the given verbosity and configured level.
#[must_use]
pub fn log_directive(verbosity: Verbosity, configured: &str) -> String {
    match verbosity {
        Verbosity::Quiet => "warn".to_string(),
        Verbosity::Verbose => "debug".to_string(),
        Verbosity::Normal => configured.to_string(),
    }
}
