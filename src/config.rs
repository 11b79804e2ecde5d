//! Run configuration.
//!
//! The export dialect this tool was built for is the German-locale WhatsApp
//! export, which strips attachments from the text and leaves a literal
//! placeholder behind. Both the placeholder and the annotation written in
//! its place are locale-specific strings, so they live in a config struct
//! rather than being hard-wired.
//!
//! # Example
//!
//! ```rust
//! use chatarchive::config::ArchiveConfig;
//!
//! let config = ArchiveConfig::new()
//!     .with_media_placeholder("<Media omitted>")
//!     .with_attachment_note("file attached");
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for one archive run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Literal marker the export leaves where an attachment was stripped
    /// (default: `<Medien ausgeschlossen>`).
    pub media_placeholder: String,

    /// Annotation written after a substituted filename
    /// (default: `Datei angehängt`).
    pub attachment_note: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            media_placeholder: "<Medien ausgeschlossen>".to_string(),
            attachment_note: "Datei angehängt".to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the media placeholder marker.
    #[must_use]
    pub fn with_media_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.media_placeholder = placeholder.into();
        self
    }

    /// Sets the attachment annotation.
    #[must_use]
    pub fn with_attachment_note(mut self, note: impl Into<String>) -> Self {
        self.attachment_note = note.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ArchiveConfig::default();
        assert_eq!(config.media_placeholder, "<Medien ausgeschlossen>");
        assert_eq!(config.attachment_note, "Datei angehängt");
    }

    #[test]
    fn test_config_builder() {
        let config = ArchiveConfig::new()
            .with_media_placeholder("<Media omitted>")
            .with_attachment_note("file attached");

        assert_eq!(config.media_placeholder, "<Media omitted>");
        assert_eq!(config.attachment_note, "file attached");
    }
}
