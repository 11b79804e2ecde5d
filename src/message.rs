//! The message type shared by the whole pipeline.
//!
//! A [`Message`] is one logical chat message after continuation lines have
//! been folded in: a timestamp, a sender and a body.
//!
//! # Examples
//!
//! ```
//! use chatarchive::Message;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2021, 6, 15)
//!     .unwrap()
//!     .and_hms_opt(14, 30, 0)
//!     .unwrap();
//! let msg = Message::new(ts, "Alice", "Hello\nworld");
//! assert_eq!(msg.sender(), "Alice");
//! assert!(msg.body().contains('\n'));
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sender used when the first line of a file carries no discernible sender
/// (typically the export's encryption notice).
pub const NOBODY: &str = "nobody";

/// One logical message of a parsed chat export.
///
/// Export timestamps are wall-clock local times with no zone information,
/// so the timestamp is a [`NaiveDateTime`]. The body may contain embedded
/// newlines from continuation lines. Messages are immutable once assembled,
/// except for media-placeholder substitution which rewrites the trailing
/// placeholder substring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent, at the granularity the export carries
    /// (usually minutes).
    pub timestamp: NaiveDateTime,

    /// Display name of the message author, or [`NOBODY`] for the
    /// sender-less first line of a file.
    pub sender: String,

    /// Text content of the message. Multi-line when the export wrapped the
    /// message over several physical lines.
    pub body: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(
        timestamp: NaiveDateTime,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            body: body.into(),
        }
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` if the sender is the [`NOBODY`] sentinel.
    pub fn is_senderless(&self) -> bool {
        self.sender == NOBODY
    }

    /// Returns `true` if the body is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}
