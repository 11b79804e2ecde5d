//! Table-of-contents sidecar data.
//!
//! The archive can be decorated with a hand-written YAML sidecar carrying a
//! title, a list of in-page anchors and a list of external links. The
//! structure is opaque to the parsing core and passed straight through to
//! the presentation layer; missing keys default to empty.
//!
//! ```yaml
//! title: Klassentreffen
//! toc:
//!   - anchor: "Alice 2021-06-15 14:30:00"
//!     text: Planung
//! link_list:
//!   - target: "https://example.com/photos"
//!     text: Fotoalbum
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One in-page anchor entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub anchor: String,
    pub text: String,
}

/// One external link entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub target: String,
    pub text: String,
}

/// Sidecar data handed through to the HTML template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocData {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub toc: Vec<TocEntry>,

    #[serde(default)]
    pub link_list: Vec<LinkEntry>,
}

impl TocData {
    /// Loads the sidecar from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}
