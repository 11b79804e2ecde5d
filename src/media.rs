//! Media directory indexing and placeholder substitution.
//!
//! WhatsApp media files carry their capture time in the filename, e.g.
//! `WhatsApp Image 2021-06-15 at 14.32.00.jpg`. The indexer normalizes the
//! names (spaces become underscores, **renaming the files on disk**), parses
//! the embedded timestamp and groups the files into per-minute FIFO queues.
//! Each substituted placeholder then pops the next filename for its
//! message's minute.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;

use chrono::{NaiveDateTime, Timelike};
use log::{debug, warn};
use regex::Regex;

use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};

/// Pattern of the timestamp embedded in exported media filenames:
/// a `YYYY-MM-DD` date, `_at_`, a `HH.MM` time, a two-digit suffix (seconds
/// or a sequence number), and an optional `(n)` duplicate marker.
const FILENAME_PATTERN: &str = r"(?P<date>\d{4}-\d{2}-\d{2})_at_(?P<time>\d{2}\.\d{2})\.(?P<suffix>\d{2})(?:_?\((?P<dup>\d+)\))?";

/// Index of media files keyed by the minute-granularity timestamp parsed
/// from their names.
///
/// Buckets are FIFO queues: multiple attachments can share a minute, and
/// they are consumed in the order they appear in the export, which is the
/// order the indexer sorts them in (timestamp, two-digit suffix, duplicate
/// marker — an unnumbered file sorts before its `(1)`, `(2)` duplicates).
///
/// The index is built once per run and borrowed `&mut` by whichever stage
/// performs substitution; there is no sharing across runs.
#[derive(Debug, Default)]
pub struct MediaIndex {
    buckets: BTreeMap<NaiveDateTime, VecDeque<String>>,
}

impl MediaIndex {
    /// Creates an empty index (the no-media-directory case).
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a directory of media files and builds the index.
    ///
    /// Files whose names contain spaces are renamed in place (spaces become
    /// underscores) — this mutates the directory. Files whose names don't
    /// carry a recognizable timestamp are skipped with a warning. Renames
    /// are not transactional; a failure mid-scan leaves the directory in a
    /// mixed state.
    pub fn scan(dir: &Path) -> Result<Self> {
        let pattern = Regex::new(FILENAME_PATTERN).unwrap();

        let mut entries: Vec<(NaiveDateTime, u8, u32, String)> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let mut name = entry.file_name().to_string_lossy().into_owned();

            if name.contains(' ') {
                let normalized = name.replace(' ', "_");
                fs::rename(dir.join(&name), dir.join(&normalized))?;
                debug!("renamed {:?} -> {:?}", name, normalized);
                name = normalized;
            }

            let Some(caps) = pattern.captures(&name) else {
                warn!("skipping media file with unrecognized name: {:?}", name);
                continue;
            };
            let key = format!("{} {}", &caps["date"], &caps["time"]);
            let Ok(timestamp) = NaiveDateTime::parse_from_str(&key, "%Y-%m-%d %H.%M") else {
                warn!("skipping media file with invalid timestamp: {:?}", name);
                continue;
            };
            let suffix: u8 = caps["suffix"].parse().unwrap_or(0);
            let dup: u32 = caps
                .name("dup")
                .map_or(0, |m| m.as_str().parse().unwrap_or(0));
            entries.push((timestamp, suffix, dup, name));
        }

        entries.sort();

        let mut buckets: BTreeMap<NaiveDateTime, VecDeque<String>> = BTreeMap::new();
        for (timestamp, _, _, name) in entries {
            buckets.entry(timestamp).or_default().push_back(name);
        }
        Ok(Self { buckets })
    }

    /// Total number of indexed files.
    pub fn len(&self) -> usize {
        self.buckets.values().map(VecDeque::len).sum()
    }

    /// Returns `true` if no files remain in the index.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining filenames for a timestamp, in consumption order.
    pub fn files_for(&self, timestamp: NaiveDateTime) -> Option<&VecDeque<String>> {
        self.buckets.get(&minute_key(timestamp))
    }

    /// Pops the next filename for the given timestamp.
    ///
    /// Returns [`ArchiveError::MediaUnderflow`] when the bucket is missing
    /// or already exhausted — a placeholder without a matching file is a
    /// fatal inconsistency, not something to paper over with a blank.
    pub fn take(&mut self, timestamp: NaiveDateTime) -> Result<String> {
        let key = minute_key(timestamp);
        self.buckets
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .ok_or(ArchiveError::MediaUnderflow { timestamp: key })
    }

    /// Substitutes a trailing media placeholder in `body`.
    ///
    /// Returns `Ok(None)` when the body doesn't end with the placeholder,
    /// `Ok(Some(new_body))` with the placeholder rewritten to
    /// `<filename> (<attachment note>)` when it does, and an underflow
    /// error when the timestamp's queue is exhausted.
    pub fn substitute(
        &mut self,
        body: &str,
        timestamp: NaiveDateTime,
        config: &ArchiveConfig,
    ) -> Result<Option<String>> {
        let Some(prefix) = body.strip_suffix(config.media_placeholder.as_str()) else {
            return Ok(None);
        };
        let filename = self.take(timestamp)?;
        Ok(Some(format!(
            "{prefix}{filename} ({})",
            config.attachment_note
        )))
    }
}

/// Message headers may carry seconds; media filenames only carry minutes.
fn minute_key(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}
