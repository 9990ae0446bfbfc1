//! Code fence scanning shared by the table normalizer and the tokenizer.

/// An opening code fence line (```` ``` ```` or `~~~`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen<'a> {
    pub ch: char,
    pub len: usize,
    /// Leading spaces before the fence marker
    pub indent: usize,
    /// The info string following the marker, trimmed
    pub info: &'a str,
}

/// Recognize an opening fence: three or more backticks or tildes after optional
/// leading whitespace. Backtick fences may not carry backticks in their info string.
pub fn parse_fence_open(line: &str) -> Option<FenceOpen<'_>> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }
    let info = trimmed[len..].trim();
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some(FenceOpen {
        ch,
        len,
        indent,
        info,
    })
}

/// A closing fence uses the opening character, is at least as long, and carries
/// nothing else on the line.
pub fn is_fence_close(line: &str, open: &FenceOpen<'_>) -> bool {
    let trimmed = line.trim();
    let len = trimmed.chars().take_while(|c| *c == open.ch).count();
    len >= open.len && trimmed.chars().all(|c| c == open.ch)
}
