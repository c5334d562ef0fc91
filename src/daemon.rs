//! The poll loop: run a cycle, hand its events to a sink, wait, repeat.

use crate::config::WatchSettings;
use crate::shutdown::CancellationToken;
use crate::watch::{CycleReport, DirectoryScanner, IncrementalReader, WatchCycle, WatchEvent};
use std::time::{Duration, Instant};
use tracing::info;

/// Receives every event produced by the poll loop, in order.
pub trait EventSink {
    /// Handle one event.
    fn handle(&mut self, event: &WatchEvent);
}

impl<F: FnMut(&WatchEvent)> EventSink for F {
    fn handle(&mut self, event: &WatchEvent) {
        self(event);
    }
}

/// Totals for a finished [`Daemon::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles completed
    pub cycles: u64,
    /// Marker occurrences reported
    pub matches: u64,
    /// Directory scan failures reported
    pub cycle_errors: u64,
    /// Per-file read failures reported
    pub file_errors: u64,
    /// Wall time from start to stop
    pub uptime: Duration,
}

/// Runs [`WatchCycle`]s on a fixed interval until cancelled.
#[derive(Debug)]
pub struct Daemon {
    cycle: WatchCycle,
    interval: Duration,
    token: CancellationToken,
}

impl Daemon {
    #[must_use]
    pub const fn new(cycle: WatchCycle, interval: Duration, token: CancellationToken) -> Self {
        Self {
            cycle,
            interval,
            token,
        }
    }

    /// Build the cycle from resolved settings.
    #[must_use]
    pub fn from_settings(settings: &WatchSettings, token: CancellationToken) -> Self {
        let scanner = DirectoryScanner::new(settings.directory.clone(), settings.extension.as_str())
            .follow_symlinks(settings.follow_symlinks);
        let reader = IncrementalReader::new(settings.magic.as_str());
        Self::new(WatchCycle::new(scanner, reader), settings.interval, token)
    }

    #[must_use]
    pub const fn cycle(&self) -> &WatchCycle {
        &self.cycle
    }

    /// Run a single cycle and pass its events to `sink`.
    pub fn run_once<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> CycleReport {
        let report = self.cycle.run();
        for event in &report.events {
            sink.handle(event);
        }
        report
    }

    /// Poll until the token is cancelled.
    ///
    /// Cancellation is observed before each cycle and interrupts the wait
    /// between cycles; a cycle already running is allowed to finish.
    pub fn run<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary {
            cycles: 0,
            matches: 0,
            cycle_errors: 0,
            file_errors: 0,
            uptime: Duration::ZERO,
        };

        info!(
            directory = %self.cycle.scanner().directory().display(),
            extension = self.cycle.scanner().extension(),
            magic = self.cycle.reader().marker(),
            interval = %humantime::format_duration(self.interval),
            "Watching directory"
        );

        while !self.token.is_cancelled() {
            let report = self.run_once(sink);
            summary.cycles += 1;
            summary.matches += report.match_count() as u64;
            let file_errors = report.file_error_count();
            summary.file_errors += file_errors as u64;
            summary.cycle_errors += (report.error_count() - file_errors) as u64;

            if self.token.wait_timeout(self.interval) {
                break;
            }
        }

        summary.uptime = started.elapsed();
        info!(
            cycles = summary.cycles,
            matches = summary.matches,
            cycle_errors = summary.cycle_errors,
            file_errors = summary.file_errors,
            uptime = %humantime::format_duration(Duration::from_secs(summary.uptime.as_secs())),
            "Shutting down"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::WatchDir;
    use anyhow::Result;
    use std::thread;

    fn settings(dir: &WatchDir, interval: Duration) -> WatchSettings {
        WatchSettings {
            directory: dir.path().to_path_buf(),
            extension: ".log".to_string(),
            magic: "ERROR".to_string(),
            interval,
            follow_symlinks: true,
        }
    }

    #[test]
    fn test_run_once_feeds_sink() -> Result<()> {
        let dir = WatchDir::new()?;
        dir.write("a.log", "ERROR\n")?;
        let mut daemon = Daemon::from_settings(
            &settings(&dir, Duration::from_secs(1)),
            CancellationToken::new(),
        );

        let mut seen = Vec::new();
        let report = daemon.run_once(&mut |e: &WatchEvent| seen.push(e.kind()));

        assert_eq!(seen, vec!["added", "found"]);
        assert_eq!(report.match_count(), 1);

        Ok(())
    }

    #[test]
    fn test_pre_cancelled_runs_no_cycles() -> Result<()> {
        let dir = WatchDir::new()?;
        dir.write("a.log", "ERROR\n")?;
        let token = CancellationToken::new();
        token.cancel();
        let mut daemon = Daemon::from_settings(&settings(&dir, Duration::from_secs(60)), token);

        let mut seen = 0;
        let summary = daemon.run(&mut |_: &WatchEvent| seen += 1);

        assert_eq!(summary.cycles, 0);
        assert_eq!(seen, 0);

        Ok(())
    }

    #[test]
    fn test_cancel_interrupts_long_interval() -> Result<()> {
        let dir = WatchDir::new()?;
        dir.write("a.log", "ERROR\n")?;
        let token = CancellationToken::new();
        let mut daemon =
            Daemon::from_settings(&settings(&dir, Duration::from_secs(3600)), token.clone());

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token.cancel();
        });

        let started = Instant::now();
        let summary = daemon.run(&mut |_: &WatchEvent| {});
        canceller.join().unwrap();

        assert_eq!(summary.cycles, 1);
        assert_eq!(summary.matches, 1);
        assert!(started.elapsed() < Duration::from_secs(60));

        Ok(())
    }

    #[test]
    fn test_missing_directory_counts_errors() -> Result<()> {
        let dir = WatchDir::new()?;
        let mut settings = settings(&dir, Duration::from_millis(10));
        settings.directory = dir.file("missing");
        let token = CancellationToken::new();
        let mut daemon = Daemon::from_settings(&settings, token.clone());

        let mut cycles = 0;
        let summary = daemon.run(&mut |e: &WatchEvent| {
            assert_eq!(e.kind(), "error");
            cycles += 1;
            if cycles == 3 {
                token.cancel();
            }
        });

        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.cycle_errors, 3);
        assert_eq!(summary.file_errors, 0);

        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_file_errors_counted_apart_from_scan_errors() -> Result<()> {
        let mem = std::path::Path::new("/proc/self/mem");
        if !mem.exists() {
            return Ok(());
        }

        let dir = WatchDir::new()?;
        std::os::unix::fs::symlink(mem, dir.file("a.log"))?;
        dir.write("b.log", "ERROR\n")?;
        let token = CancellationToken::new();
        let mut daemon = Daemon::from_settings(&settings(&dir, Duration::from_millis(10)), token.clone());

        let mut cycles = 0;
        let summary = daemon.run(&mut |e: &WatchEvent| {
            if e.kind() == "error" {
                cycles += 1;
                if cycles == 2 {
                    token.cancel();
                }
            }
        });

        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.file_errors, 2);
        assert_eq!(summary.cycle_errors, 0);
        assert_eq!(summary.matches, 1);

        Ok(())
    }
}
