//! Incremental reading of tracked files.
//!
//! Each read resumes at the record's saved byte offset, consumes every
//! newline-terminated line up to end-of-file, and reports lines that contain
//! the marker string together with their absolute line numbers. A trailing
//! line without a terminator is left unread so it is scanned whole once the
//! writer finishes it.

use super::error::{WatchError, WatchResult};
use super::record::FileRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use tracing::{Level, debug, span, trace};

/// A line that contained the marker string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    /// 1-based line number from the start of the file
    pub line_number: u64,
    /// Line text without the trailing `\n` / `\r\n`
    pub text: String,
}

/// What a single call to [`IncrementalReader::read`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    /// False when the file was unchanged and no bytes were read
    pub performed: bool,
    /// The file had shrunk below the saved offset and was re-read from 0
    pub truncated: bool,
    /// Complete lines consumed by this read
    pub lines_read: u64,
    /// Matching lines, in file order
    pub matches: Vec<MarkerMatch>,
}

impl ReadOutcome {
    const fn skipped() -> Self {
        Self {
            performed: false,
            truncated: false,
            lines_read: 0,
            matches: Vec::new(),
        }
    }
}

/// Reads appended content and looks for the marker string.
#[derive(Debug, Clone)]
pub struct IncrementalReader {
    /// Case-sensitive substring looked for in every line
    marker: String,
}

impl IncrementalReader {
    /// Create a reader looking for `marker`.
    ///
    /// An empty marker matches every line; callers validate it beforehand.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether `record` needs to be read given the file's current state.
    #[must_use]
    pub fn needs_read(record: &FileRecord, modified: std::time::SystemTime, size: u64) -> bool {
        record.first_read || modified != record.last_modified || size < record.byte_offset
    }

    /// Read whatever was appended to the file since the last read.
    ///
    /// On success the record's offset, line count and mtime are advanced and
    /// `first_read` is cleared. On failure the record is left exactly as it
    /// was, so the next cycle retries from the same position.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::FileVanished`] if the file no longer exists, or
    /// [`WatchError::FileUnreadable`] for any other I/O failure.
    pub fn read(&self, record: &mut FileRecord) -> WatchResult<ReadOutcome> {
        let path = record.identity().to_path_buf();
        let span = span!(Level::DEBUG, "read_file", path = %path.display());
        let _guard = span.enter();

        let io_err = |source| WatchError::from_file_io(&path, source);

        let metadata = std::fs::metadata(&path).map_err(io_err)?;
        let modified = metadata.modified().map_err(io_err)?;
        let size = metadata.len();

        if !Self::needs_read(record, modified, size) {
            trace!("Unchanged, skipping");
            return Ok(ReadOutcome::skipped());
        }

        let mut outcome = ReadOutcome {
            performed: true,
            ..ReadOutcome::default()
        };

        let (mut offset, mut line_count) = if size < record.byte_offset {
            debug!(
                size,
                offset = record.byte_offset,
                "File shrank, reading again from the start"
            );
            outcome.truncated = true;
            (0, 0)
        } else {
            (record.byte_offset, record.line_count)
        };

        let file = File::open(&path).map_err(io_err)?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(offset)).map_err(io_err)?;

        let mut line = Vec::new();
        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line).map_err(io_err)?;
            if n == 0 || line.last() != Some(&b'\n') {
                // EOF, or an unterminated tail that stays unread
                break;
            }

            offset += n as u64;
            line_count += 1;
            outcome.lines_read += 1;

            if let Some(text) = self.match_line(&line) {
                outcome.matches.push(MarkerMatch {
                    line_number: line_count,
                    text,
                });
            }
        }

        record.byte_offset = offset;
        record.line_count = line_count;
        record.last_modified = modified;
        record.first_read = false;

        debug!(
            lines = outcome.lines_read,
            matches = outcome.matches.len(),
            offset,
            "Read complete"
        );

        Ok(outcome)
    }

    /// Return the line's text if it contains the marker
    fn match_line(&self, line: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(strip_terminator(line));
        text.contains(self.marker.as_str())
            .then(|| text.into_owned())
    }
}

/// Drop a trailing `\n` or `\r\n`
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
