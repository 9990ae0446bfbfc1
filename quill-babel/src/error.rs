//! Error types for conversion operations

use std::fmt;

/// Errors that can occur while converting between markdown and HTML.
///
/// None of these reach the callers of the infallible entry points
/// ([`crate::markdown_to_html`], [`crate::html_to_markdown`]); those log the
/// error and hand the input back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The token stream could not be rendered (unbalanced or unexpected tokens)
    Render(String),
    /// The HTML tree could not be serialized to markdown
    Serialize(String),
    /// A panic was caught at the pipeline boundary
    Panic(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Render(msg) => write!(f, "Render error: {msg}"),
            ConvertError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            ConvertError::Panic(msg) => write!(f, "Pipeline panicked: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = ConvertError::Render("unbalanced container_close".to_string());
        assert_eq!(err.to_string(), "Render error: unbalanced container_close");
        let err = ConvertError::Serialize("empty document".to_string());
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
