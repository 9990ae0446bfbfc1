//! Content format classification
//!
//! Stored article bodies carry no format tag, so the format is guessed from
//! the text itself. The verdict is decided in this order:
//!
//! 1. Blank text is HTML (opaque, passed through).
//! 2. The markdown tokenizer runs as a probe. Any structural token (heading,
//!    list, fence, math, container, emphasis, link, ...) means markdown. Raw
//!    HTML tokens are noted but decide nothing on their own, so a markdown
//!    document with an embedded `<div>` stays markdown.
//! 3. Otherwise a list of heuristic patterns runs over the whole text. Any
//!    match means markdown, even next to embedded HTML: `<div>**x**</div>` is
//!    markdown while `<div>x</div>` is HTML.
//! 4. Everything else is HTML. Plain text is never reported as markdown.

use crate::format::ContentFormat;
use crate::formats::markdown::tokenize;
use crate::ir::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fallback patterns, named for logging.
static HEURISTICS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("heading", r"(?m)^#{1,6}\s+\S"),
        ("list", r"(?m)^\s{0,3}(?:[-*+]|\d{1,9}[.)])\s+\S"),
        ("fenced code", r"(?m)^\s{0,3}(?:```|~~~)"),
        ("bold", r"\*\*[^*\n]+\*\*|__[^_\n]+__"),
        ("italic", r"(?m)(?:^|\s)[*_][^*_\s][^*_\n]*[*_](?:\s|$|[.,;:!?])"),
        ("strikethrough", r"~~[^~\n]+~~"),
        ("table row", r"(?m)^\s*\|.*\|\s*$"),
        (
            "divider row",
            r"(?m)^\s*\|?\s*:?-{3,}:?\s*(?:\|\s*:?-{3,}:?\s*)+\|?\s*$",
        ),
        ("block math", r"(?m)^\s*\$\$"),
        ("inline math", r"\$[^$\s][^$\n]*\$"),
        ("link", r"!?\[[^\]\n]*\]\([^)\n]*\)"),
        ("blockquote", r"(?m)^\s{0,3}>\s"),
        ("container", r"(?m)^\s{0,3}:{3,}\s*[A-Za-z]"),
        ("task", r"(?m)^\s*[-*+]\s+\[[ xX]\]"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Structure,
    EmbeddedHtml,
    Plain,
}

/// Decide whether `text` is markdown or HTML. Total and deterministic.
pub fn classify(text: &str) -> ContentFormat {
    if text.trim().is_empty() {
        return ContentFormat::Html;
    }

    let tokens = tokenize(text);
    let probe = probe_tokens(&tokens);
    if probe == Probe::Structure {
        tracing::debug!("classified as markdown from token structure");
        return ContentFormat::Markdown;
    }

    if let Some((name, _)) = HEURISTICS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
    {
        tracing::debug!(pattern = name, "classified as markdown from heuristic");
        return ContentFormat::Markdown;
    }

    tracing::debug!(embedded_html = probe == Probe::EmbeddedHtml, "classified as html");
    ContentFormat::Html
}

fn probe_tokens(tokens: &[Token]) -> Probe {
    let mut probe = Probe::Plain;
    for token in tokens {
        match token.kind {
            TokenKind::ParagraphOpen | TokenKind::ParagraphClose => {}
            TokenKind::HtmlBlock => probe = Probe::EmbeddedHtml,
            TokenKind::Inline => {
                for child in &token.children {
                    match child.kind {
                        TokenKind::Text | TokenKind::Softbreak | TokenKind::Hardbreak => {}
                        TokenKind::HtmlInline => probe = Probe::EmbeddedHtml,
                        _ => return Probe::Structure,
                    }
                }
            }
            _ => return Probe::Structure,
        }
    }
    probe
}
