//! WhatsApp TXT export parsing.
//!
//! An export is a sequence of physical lines. A line that starts with a
//! timestamp opens a new message (a *header* line); any other line continues
//! the previous message's body. The very first line of a file may lack a
//! sender (the export's encryption notice) and is attributed to
//! [`NOBODY`](crate::message::NOBODY).
//!
//! Recognized header shapes (day-first dates):
//! - `15.06.21, 14:30 - Alice: Hello`
//! - `[15.06.2021, 14:30:12] Alice: Hello`
//! - `15/06/2021, 2:30 PM - Alice: Hello`

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::media::MediaIndex;
use crate::message::{Message, NOBODY};

const DATE_PART: &str = r"[\d/.\-]+";
const TIME_PART: &str = r"[\d:]+(?: ?[AP]M)?";
const SEPARATOR_PART: &str = r"(?: - |: | )";

/// Ordered chrono formats tried against `"<date> <time>"`. Day-first comes
/// first so ambiguous dates resolve to the source export's locale
/// convention; four-digit years before two-digit so `2021` never parses
/// as `20` + garbage.
const DATETIME_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d.%m.%y %H:%M:%S",
    "%d.%m.%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d-%m-%y %H:%M:%S",
    "%d-%m-%y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %I:%M:%S %p",
    "%d.%m.%Y %I:%M %p",
    "%d.%m.%y %I:%M:%S %p",
    "%d.%m.%y %I:%M %p",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%y %I:%M:%S %p",
    "%d/%m/%y %I:%M %p",
];

/// Parser for WhatsApp TXT exports.
///
/// Owns its two compiled patterns (header with sender, first-line without),
/// so repeated calls never recompile and no global state is involved.
///
/// # Example
///
/// ```rust,no_run
/// use chatarchive::parser::ExportParser;
///
/// let parser = ExportParser::new();
/// let messages = parser.parse("whatsapp_chat.txt".as_ref())?;
/// # Ok::<(), chatarchive::ArchiveError>(())
/// ```
pub struct ExportParser {
    config: ArchiveConfig,
    header_re: Regex,
    firstline_re: Regex,
}

impl ExportParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ArchiveConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ArchiveConfig) -> Self {
        let datetime = format!(r"^\[?(?P<date>{DATE_PART}),? (?P<time>{TIME_PART})\]?");
        let header_re = Regex::new(&format!(
            r"{datetime}{SEPARATOR_PART}(?P<sender>[^:]+): (?P<body>.*)$"
        ))
        .unwrap();
        let firstline_re =
            Regex::new(&format!(r"{datetime}{SEPARATOR_PART}(?P<body>.*)$")).unwrap();
        Self {
            config,
            header_re,
            firstline_re,
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Attempts to parse one physical line as a message header.
    ///
    /// Returns the started message on a match (with sender
    /// [`NOBODY`] for the sender-less first-line form), or `None` for a
    /// continuation line.
    pub fn parse_line(&self, line: &str) -> Option<Message> {
        if let Some(caps) = self.header_re.captures(line) {
            if let Some(ts) = parse_timestamp(&caps["date"], &caps["time"]) {
                return Some(Message::new(ts, caps["sender"].trim(), &caps["body"]));
            }
        }
        // Maybe it's the first line, which doesn't contain a sender.
        if let Some(caps) = self.firstline_re.captures(line) {
            if let Some(ts) = parse_timestamp(&caps["date"], &caps["time"]) {
                return Some(Message::new(ts, NOBODY, &caps["body"]));
            }
        }
        None
    }

    /// Parses an export file into messages.
    ///
    /// The file is read as UTF-8; a leading byte-order mark is tolerated.
    pub fn parse(&self, path: &Path) -> Result<Vec<Message>> {
        let content = fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Like [`parse`](Self::parse), substituting media placeholders from
    /// `media` as messages are finalized.
    pub fn parse_with_media(&self, path: &Path, media: &mut MediaIndex) -> Result<Vec<Message>> {
        let content = fs::read_to_string(path)?;
        self.parse_str_with_media(&content, media)
    }

    /// Parses export content into messages.
    pub fn parse_str(&self, content: &str) -> Result<Vec<Message>> {
        self.assemble(content, None)
    }

    /// Like [`parse_str`](Self::parse_str), substituting media placeholders
    /// from `media` as messages are finalized.
    pub fn parse_str_with_media(
        &self,
        content: &str,
        media: &mut MediaIndex,
    ) -> Result<Vec<Message>> {
        self.assemble(content, Some(media))
    }

    /// Folds physical lines into logical messages.
    ///
    /// A header line finalizes the message being accumulated and starts a
    /// new one; any other line is appended (right-trimmed, newline-joined)
    /// to the current body. A non-header line with nothing to append to is
    /// a fatal parse error carrying the line and both patterns.
    fn assemble(
        &self,
        content: &str,
        mut media: Option<&mut MediaIndex>,
    ) -> Result<Vec<Message>> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut messages = Vec::new();
        let mut current: Option<Message> = None;
        for line in content.lines() {
            if let Some(started) = self.parse_line(line) {
                if let Some(done) = current.take() {
                    messages.push(self.finalize(done, media.as_deref_mut())?);
                }
                current = Some(started);
            } else if let Some(msg) = current.as_mut() {
                msg.body.push('\n');
                msg.body.push_str(line.trim_end());
            } else {
                return Err(ArchiveError::first_line(
                    line,
                    self.header_re.as_str(),
                    self.firstline_re.as_str(),
                ));
            }
        }
        // The last message remains.
        if let Some(done) = current {
            messages.push(self.finalize(done, media.as_deref_mut())?);
        }
        Ok(messages)
    }

    fn finalize(&self, mut msg: Message, media: Option<&mut MediaIndex>) -> Result<Message> {
        if let Some(index) = media {
            if let Some(body) = index.substitute(&msg.body, msg.timestamp, &self.config)? {
                msg.body = body;
            }
        }
        Ok(msg)
    }
}

impl Default for ExportParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let combined = format!("{date} {time}");
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
}
