//! Admonition container types
//!
//! The set of admonition kinds is closed. Each kind has a display title used
//! when the opening fence (`::: tip`) carries no explicit title.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic admonition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmonitionKind {
    Info,
    Tip,
    Note,
    Success,
    Warning,
    Danger,
    Important,
    Caution,
}

impl AdmonitionKind {
    pub const ALL: [AdmonitionKind; 8] = [
        AdmonitionKind::Info,
        AdmonitionKind::Tip,
        AdmonitionKind::Note,
        AdmonitionKind::Success,
        AdmonitionKind::Warning,
        AdmonitionKind::Danger,
        AdmonitionKind::Important,
        AdmonitionKind::Caution,
    ];

    /// Lowercase name as written after the `:::` fence
    pub fn name(self) -> &'static str {
        match self {
            AdmonitionKind::Info => "info",
            AdmonitionKind::Tip => "tip",
            AdmonitionKind::Note => "note",
            AdmonitionKind::Success => "success",
            AdmonitionKind::Warning => "warning",
            AdmonitionKind::Danger => "danger",
            AdmonitionKind::Important => "important",
            AdmonitionKind::Caution => "caution",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Title shown when the fence does not supply one.
    pub fn default_title(self) -> &'static str {
        match self {
            AdmonitionKind::Info => "Info",
            AdmonitionKind::Tip => "Tip",
            AdmonitionKind::Note => "Note",
            AdmonitionKind::Success => "Success",
            AdmonitionKind::Warning => "Warning",
            AdmonitionKind::Danger => "Danger",
            AdmonitionKind::Important => "Important",
            AdmonitionKind::Caution => "Caution",
        }
    }

    /// CSS class carried by the rendered container, e.g. `admonition-tip`
    pub fn css_class(self) -> String {
        format!("admonition-{}", self.name())
    }
}

impl fmt::Display for AdmonitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(AdmonitionKind::from_name("TIP"), Some(AdmonitionKind::Tip));
        assert_eq!(
            AdmonitionKind::from_name("Warning"),
            Some(AdmonitionKind::Warning)
        );
        assert_eq!(AdmonitionKind::from_name("theorem"), None);
    }

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in AdmonitionKind::ALL {
            assert_eq!(AdmonitionKind::from_name(kind.name()), Some(kind));
            assert!(!kind.default_title().is_empty());
        }
    }
}
