//! `data-config` attribute codec
//!
//! Rendered math, admonition and footnote elements carry a small record
//! describing the node they came from. The record is stored as a form-encoded
//! string (`kind=math&variant=block`) so it survives any HTML editor that
//! preserves unknown attributes, and it is read back by the serializer.
//!
//! Decoding is total: unknown keys are ignored and garbage yields the default
//! record.

use url::form_urlencoded;

/// Name of the HTML attribute holding an encoded [`NodeConfig`]
pub const CONFIG_ATTR: &str = "data-config";

/// Metadata attached to a rendered extended node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// Node family: `math`, `admonition` or `footnote`
    pub kind: String,
    /// Family-specific discriminator (`block`/`inline`, admonition type, footnote label)
    pub variant: String,
    /// Display title, when the node has one
    pub title: String,
}

impl NodeConfig {
    pub fn new(kind: &str, variant: &str) -> Self {
        NodeConfig {
            kind: kind.to_string(),
            variant: variant.to_string(),
            title: String::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Encode as `application/x-www-form-urlencoded`. Empty fields are omitted.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            ("kind", &self.kind),
            ("variant", &self.variant),
            ("title", &self.title),
        ] {
            if !value.is_empty() {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Decode an encoded record. Never fails.
    pub fn decode(encoded: &str) -> Self {
        let mut config = NodeConfig::default();
        for (key, value) in form_urlencoded::parse(encoded.trim().as_bytes()) {
            match key.as_ref() {
                "kind" => config.kind = value.into_owned(),
                "variant" => config.variant = value.into_owned(),
                "title" => config.title = value.into_owned(),
                _ => {}
            }
        }
        config
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.variant.is_empty() && self.title.is_empty()
    }
}
