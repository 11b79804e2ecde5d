//! # chatarchive
//!
//! A Rust library and CLI for turning WhatsApp conversation exports into a
//! browsable, self-contained HTML archive.
//!
//! ## Overview
//!
//! A WhatsApp export is a plain text file of timestamped lines, with
//! multi-line messages wrapped over continuation lines and attachments
//! replaced by a locale-specific placeholder. chatarchive reassembles the
//! logical messages, optionally merges two overlapping exports of the same
//! conversation, substitutes attachment filenames back into placeholder
//! messages, and renders the result as a single HTML page with embedded
//! `<img>`/`<video>`/`<audio>` tags and clickable links.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatarchive::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let parser = ExportParser::new();
//!     let messages = parser.parse("whatsapp_chat.txt".as_ref())?;
//!
//!     let runs = group_runs(messages);
//!     let html = render_page(
//!         &runs,
//!         &TocData::default(),
//!         "whatsapp_chat.txt",
//!         chrono::Local::now().naive_local(),
//!     );
//!     let html = PostProcessor::new(&ArchiveConfig::default()).process(&html);
//!     std::fs::write("archive.html", html)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Merging two exports
//!
//! ```rust,no_run
//! use chatarchive::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = ArchiveConfig::default();
//! let parser = ExportParser::with_config(config.clone());
//!
//! let old = parser.parse("old_export.txt".as_ref())?;
//! let new = parser.parse("new_export.txt".as_ref())?;
//!
//! let mut media = MediaIndex::scan("WhatsApp_Media".as_ref())?;
//! let merged = merge_exports(old, new, &mut media, &config)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — line parsing and message assembly
//! - [`media`] — media directory indexing and placeholder substitution
//! - [`merge`] — outer-join merge of two exports
//! - [`render`] — sender-run grouping, HTML template, post-processing
//! - [`toc`] — table-of-contents sidecar data
//! - [`config`] — run configuration ([`ArchiveConfig`](config::ArchiveConfig))
//! - [`error`] — unified error types ([`ArchiveError`], [`Result`])
//! - [`cli`] — CLI argument types (behind the `cli` feature)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod merge;
pub mod message;
pub mod parser;
pub mod render;
pub mod toc;

// Re-export the main types at the crate root for convenience
pub use error::{ArchiveError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatarchive::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::Message;

    // Error types
    pub use crate::error::{ArchiveError, Result};

    // Configuration
    pub use crate::config::ArchiveConfig;

    // Parsing
    pub use crate::parser::ExportParser;

    // Media indexing
    pub use crate::media::MediaIndex;

    // Merging
    pub use crate::merge::{MergeKey, merge_exports, merge_keys};

    // Presentation
    pub use crate::render::{PostProcessor, SenderRun, group_runs, render_page};

    // TOC sidecar
    pub use crate::toc::{LinkEntry, TocData, TocEntry};
}
