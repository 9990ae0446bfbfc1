//! Pipe-table helpers and the table normalization preprocessor
//!
//! Authors (and some editors) write pipe tables with a blank line between every
//! row. Base markdown grammar ends a table at the first blank line, so such
//! text would render as a pile of paragraphs. [`normalize_tables`] runs on the
//! raw text before tokenization and collapses those blocks into the canonical
//! adjacent form:
//!
//! ```text
//! | a | b |                | a | b |
//!                          | --- | --- |
//! | --- | --- |     →      | 1 | 2 |
//!
//! | 1 | 2 |
//! ```
//!
//! The pass is conservative: a block is only rewritten when it has a valid
//! header row, a valid divider row with the same cell count, and nothing but
//! valid rows after that. Anything else is emitted byte for byte. Fenced code
//! is never inspected.

use super::fence::{is_fence_close, parse_fence_open, FenceOpen};
use serde::Serialize;

/// Column alignment declared by a divider cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Value for a `text-align` CSS declaration, if any
    pub fn css(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// Split a table row into trimmed cells.
///
/// A leading and a trailing unescaped `|` are dropped; escaped pipes (`\|`)
/// stay inside their cell.
pub fn split_row(line: &str) -> Vec<String> {
    let mut s = line.trim();
    if let Some(stripped) = s.strip_prefix('|') {
        s = stripped;
    }
    if s.ends_with('|') && !s.ends_with("\\|") {
        s = &s[..s.len() - 1];
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('\\');
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// A divider cell: optional colons around a run of at least `min_dashes` dashes.
/// Internal whitespace is ignored.
pub fn is_divider_cell(cell: &str, min_dashes: usize) -> bool {
    let compact: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = compact.strip_prefix(':').unwrap_or(&compact);
    let inner = inner.strip_suffix(':').unwrap_or(inner);
    inner.len() >= min_dashes && inner.chars().all(|c| c == '-')
}

fn cell_alignment(cell: &str) -> Alignment {
    let compact: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
    match (compact.starts_with(':'), compact.ends_with(':')) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    }
}

/// Parse a divider row, returning one alignment per column.
///
/// The tokenizer accepts the lenient single-dash form (`:-:`) so that tables
/// printed by the serializer read back; the normalizer is stricter.
pub fn parse_divider(line: &str, min_dashes: usize) -> Option<Vec<Alignment>> {
    if !line.contains('-') {
        return None;
    }
    let cells = split_row(line);
    if cells.is_empty() || !cells.iter().all(|cell| is_divider_cell(cell, min_dashes)) {
        return None;
    }
    Some(cells.iter().map(|cell| cell_alignment(cell)).collect())
}

const NORMALIZE_MIN_DASHES: usize = 3;

/// A table candidate starts with `|` and has at least two non-empty cells.
fn is_candidate_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && split_row(trimmed).iter().filter(|c| !c.is_empty()).count() >= 2
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Whether a collected block of candidate rows reads as one table.
fn qualifies_as_table(rows: &[&str]) -> bool {
    if rows.len() < 2 || !is_candidate_row(rows[0]) {
        return false;
    }
    let header_cells = split_row(rows[0]).len();
    match parse_divider(rows[1], NORMALIZE_MIN_DASHES) {
        Some(alignments) if alignments.len() == header_cells => {}
        _ => return false,
    }
    rows[2..].iter().all(|row| is_candidate_row(row))
}

fn emit_block<'a>(block: &[&'a str], out: &mut Vec<&'a str>) {
    let trailing_blanks = block.iter().rev().take_while(|line| is_blank(line)).count();
    let content = &block[..block.len() - trailing_blanks];
    let rows: Vec<&str> = content.iter().copied().filter(|l| !is_blank(l)).collect();

    if rows.len() != content.len() && qualifies_as_table(&rows) {
        out.extend(rows);
        out.extend(&block[content.len()..]);
    } else {
        out.extend(block);
    }
}

/// Collapse blank-line-interspersed pipe tables into adjacent rows.
///
/// Pure, total and idempotent. Text outside qualifying table blocks, including
/// everything inside fenced code, is returned unchanged.
pub fn normalize_tables(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut fence: Option<FenceOpen<'_>> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(open) = &fence {
            if leading_spaces(line) <= 3 && is_fence_close(line, open) {
                fence = None;
            }
            out.push(line);
            i += 1;
            continue;
        }

        // Deeper indentation is indented code, not a fence
        if let Some(open) = parse_fence_open(line).filter(|open| open.indent <= 3) {
            fence = Some(open);
            out.push(line);
            i += 1;
            continue;
        }

        if is_candidate_row(line) {
            let mut end = i + 1;
            while end < lines.len() && (is_candidate_row(lines[end]) || is_blank(lines[end])) {
                end += 1;
            }
            emit_block(&lines[i..end], &mut out);
            i = end;
            continue;
        }

        out.push(line);
        i += 1;
    }

    out.join("\n")
}
