//! One scan, diff and read pass over the watched directory.

use super::detector::ChangeDetector;
use super::event::WatchEvent;
use super::reader::IncrementalReader;
use super::registry::WatchRegistry;
use super::scanner::DirectoryScanner;
use tracing::{Level, debug, span, warn};

/// Events and counters from a single [`WatchCycle::run`].
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Events in the order they happened: additions, removals, then per-file
    /// matches and read errors in registry order
    pub events: Vec<WatchEvent>,
    /// Files whose content was actually read this cycle
    pub files_read: usize,
}

impl CycleReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of `MagicStringFound` events.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, WatchEvent::MagicStringFound { .. }))
            .count()
    }

    /// Number of `CycleError` events.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, WatchEvent::CycleError { .. }))
            .count()
    }

    /// Number of `CycleError` events about a single file.
    #[must_use]
    pub fn file_error_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, WatchEvent::CycleError { error } if error.is_per_file()))
            .count()
    }
}

/// Owns the registry and drives scanner, detector and reader once per call.
#[derive(Debug)]
pub struct WatchCycle {
    scanner: DirectoryScanner,
    detector: ChangeDetector,
    reader: IncrementalReader,
    registry: WatchRegistry,
}

impl WatchCycle {
    /// Create a cycle with an empty registry.
    #[must_use]
    pub fn new(scanner: DirectoryScanner, reader: IncrementalReader) -> Self {
        Self::with_registry(scanner, reader, WatchRegistry::new())
    }

    /// Create a cycle that continues from an existing registry.
    #[must_use]
    pub const fn with_registry(
        scanner: DirectoryScanner,
        reader: IncrementalReader,
        registry: WatchRegistry,
    ) -> Self {
        Self {
            scanner,
            detector: ChangeDetector,
            reader,
            registry,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn scanner(&self) -> &DirectoryScanner {
        &self.scanner
    }

    #[must_use]
    pub const fn reader(&self) -> &IncrementalReader {
        &self.reader
    }

    /// Run one full pass.
    ///
    /// A failed directory listing is reported and ends the pass without
    /// touching the registry, so an unreadable directory never shows up as
    /// every file being removed. A failed read of one file is reported and
    /// the remaining files are still read.
    pub fn run(&mut self) -> CycleReport {
        let span = span!(
            Level::DEBUG,
            "watch_cycle",
            directory = %self.scanner.directory().display()
        );
        let _guard = span.enter();

        let mut report = CycleReport::default();

        let candidates = match self.scanner.scan() {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(error = %error, "Scan failed, skipping this cycle");
                report.events.push(error.into());
                return report;
            }
        };

        let changes = self.detector.apply(&candidates, &mut self.registry);
        if !changes.is_empty() {
            debug!(
                added = changes.added.len(),
                removed = changes.removed.len(),
                tracked = self.registry.len(),
                "Directory contents changed"
            );
        }
        report.events.extend(changes.into_events());

        for identity in self.registry.paths() {
            let Some(record) = self.registry.get_mut(&identity) else {
                continue;
            };

            match self.reader.read(record) {
                Ok(outcome) => {
                    if outcome.performed {
                        report.files_read += 1;
                    }
                    report
                        .events
                        .extend(outcome.matches.into_iter().map(|m| {
                            WatchEvent::MagicStringFound {
                                path: identity.clone(),
                                line_number: m.line_number,
                                text: m.text,
                            }
                        }));
                }
                Err(error) => {
                    warn!(error = %error, "Read failed, will retry next cycle");
                    report.events.push(error.into());
                }
            }
        }

        debug!(
            tracked = self.registry.len(),
            files_read = report.files_read,
            events = report.events.len(),
            "Cycle complete"
        );

        report
    }
}
