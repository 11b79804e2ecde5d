//! Unified error types for chatarchive.
//!
//! This module provides a single [`ArchiveError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging

use std::io;

use chrono::NaiveDateTime;
use thiserror::Error;

/// A specialized [`Result`] type for chatarchive operations.
///
/// # Example
///
/// ```rust
/// use chatarchive::error::Result;
/// use chatarchive::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// The error type for all chatarchive operations.
///
/// Every fatal condition of a run is a variant here; a run either completes
/// or aborts on the first one. Non-fatal conditions (a media file with an
/// unrecognized name) are logged and skipped instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - An input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing the archive)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The first line of an export file matched neither header pattern.
    ///
    /// Carries the raw line and both patterns so the failure can be
    /// diagnosed against the actual export dialect.
    #[error(
        "can't parse the first line {line:?}; tried header pattern `{header_pattern}` and first-line pattern `{firstline_pattern}`"
    )]
    FirstLine {
        /// The offending physical line, verbatim.
        line: String,
        /// The full header pattern (timestamp + sender + body).
        header_pattern: String,
        /// The first-line pattern (timestamp + body, no sender).
        firstline_pattern: String,
    },

    /// A media substitution was requested for a timestamp whose queue is
    /// already exhausted.
    ///
    /// More placeholder messages point at this minute than media files carry
    /// it in their name — the export and the media directory disagree.
    #[error("no media file left for timestamp {timestamp} (media queue exhausted)")]
    MediaUnderflow {
        /// The minute-granularity timestamp whose bucket ran dry.
        timestamp: NaiveDateTime,
    },

    /// The TOC sidecar file could not be parsed as YAML.
    #[error("TOC error: {0}")]
    Toc(#[from] serde_yaml::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ArchiveError {
    /// Creates a first-line parse error from the offending line and the two
    /// patterns that were attempted.
    pub fn first_line(
        line: impl Into<String>,
        header_pattern: impl Into<String>,
        firstline_pattern: impl Into<String>,
    ) -> Self {
        ArchiveError::FirstLine {
            line: line.into(),
            header_pattern: header_pattern.into(),
            firstline_pattern: firstline_pattern.into(),
        }
    }

    /// Creates a media-underflow error for the given timestamp.
    pub fn media_underflow(timestamp: NaiveDateTime) -> Self {
        ArchiveError::MediaUnderflow { timestamp }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ArchiveError::Io(_))
    }

    /// Returns `true` if this is a first-line parse error.
    pub fn is_first_line(&self) -> bool {
        matches!(self, ArchiveError::FirstLine { .. })
    }

    /// Returns `true` if this is a media-underflow error.
    pub fn is_media_underflow(&self) -> bool {
        matches!(self, ArchiveError::MediaUnderflow { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
