//! Content format definition
//!
//! Stored article bodies are either markdown or HTML. [`ContentFormat`] is the
//! closed verdict returned by the classifier and the vocabulary the CLI uses
//! for `--from` / `--to`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two representations the pipeline converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Markdown,
    Html,
}

impl ContentFormat {
    /// The canonical name of this format ("markdown" or "html")
    pub fn name(self) -> &'static str {
        match self {
            ContentFormat::Markdown => "markdown",
            ContentFormat::Html => "html",
        }
    }

    /// File extensions associated with this format, without the leading dot
    pub fn file_extensions(self) -> &'static [&'static str] {
        match self {
            ContentFormat::Markdown => &["md", "markdown"],
            ContentFormat::Html => &["html", "htm"],
        }
    }

    /// Detect the format from a filename based on its extension.
    ///
    /// Returns `None` when the extension is missing or unknown.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();

        [ContentFormat::Markdown, ContentFormat::Html]
            .into_iter()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ContentFormat::Markdown),
            "html" | "htm" => Ok(ContentFormat::Html),
            other => Err(format!("Format '{other}' not found")),
        }
    }
}
