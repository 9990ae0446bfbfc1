//! Inline tokenizer
//!
//! Turns the raw content of an `inline` token into child tokens. Rules are
//! tried in the fixed order of [`InlineRule::ORDERED`] at every position; the
//! first rule that matches consumes input and the scan moves on. A rule that
//! cannot complete its match leaves the parser untouched, and `Text` always
//! matches, so every input is consumed.

use super::footnote::FootnoteEnv;
use crate::ir::{Token, TokenKind, TokenMeta};
use once_cell::sync::Lazy;
use regex::Regex;

/// Nesting limit for emphasis and link text
const MAX_DEPTH: usize = 24;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:<[A-Za-z][A-Za-z0-9-]*(?:\s+[A-Za-z_:][A-Za-z0-9_.:-]*(?:\s*=\s*(?:[^\s"'=<>`]+|'[^']*'|"[^"]*"))?)*\s*/?>|</[A-Za-z][A-Za-z0-9-]*\s*>|<!--[\s\S]*?-->)"#,
    )
    .unwrap()
});

static URL_AUTOLINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*)>").unwrap());

static EMAIL_AUTOLINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)>",
    )
    .unwrap()
});

static SAFE_DATA_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/(?:gif|png|jpeg|webp);").unwrap());

/// Length of a complete HTML tag or comment at the start of `s`
pub(crate) fn match_html_tag(s: &str) -> Option<usize> {
    HTML_TAG.find(s).map(|m| m.end())
}

/// Whether a link or image destination may be emitted.
pub(crate) fn is_safe_url(url: &str) -> bool {
    let normalized: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if ["javascript:", "vbscript:", "file:"]
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        return false;
    }
    !normalized.starts_with("data:") || SAFE_DATA_URL.is_match(&normalized)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineRule {
    MathInline,
    Escape,
    Backticks,
    Strikethrough,
    Emphasis,
    FootnoteRef,
    Image,
    Link,
    Autolink,
    HtmlInline,
    Newline,
    Text,
}

impl InlineRule {
    /// Priority order. Math runs before escapes so `\$` is handled by the
    /// escape rule only when it is not an opener.
    const ORDERED: [InlineRule; 12] = [
        InlineRule::MathInline,
        InlineRule::Escape,
        InlineRule::Backticks,
        InlineRule::Strikethrough,
        InlineRule::Emphasis,
        InlineRule::FootnoteRef,
        InlineRule::Image,
        InlineRule::Link,
        InlineRule::Autolink,
        InlineRule::HtmlInline,
        InlineRule::Newline,
        InlineRule::Text,
    ];
}

/// Parse inline content into tokens.
pub(crate) fn parse_inline(src: &str, env: &mut FootnoteEnv) -> Vec<Token> {
    InlineParser::new(src, env, 0, false).run()
}

struct InlineParser<'s, 'e> {
    src: &'s str,
    pos: usize,
    pending: String,
    tokens: Vec<Token>,
    env: &'e mut FootnoteEnv,
    depth: usize,
    in_link: bool,
}

struct LinkParts {
    text_start: usize,
    text_end: usize,
    href: String,
    title: String,
    end: usize,
}

fn is_punct(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

/// Left- and right-flanking state of a delimiter run
fn flanking(prev: Option<char>, next: Option<char>) -> (bool, bool) {
    let prev_ws = prev.map_or(true, char::is_whitespace);
    let next_ws = next.map_or(true, char::is_whitespace);
    let prev_punct = prev.is_some_and(is_punct);
    let next_punct = next.is_some_and(is_punct);
    let left = !next_ws && (!next_punct || prev_ws || prev_punct);
    let right = !prev_ws && (!prev_punct || next_ws || next_punct);
    (left, right)
}

fn run_length(bytes: &[u8], at: usize, byte: u8) -> usize {
    bytes[at..].iter().take_while(|b| **b == byte).count()
}

/// End of the code span whose opening backtick run starts at `at`, if closed
fn code_span_end(src: &str, at: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let n = run_length(bytes, at, b'`');
    let mut i = at + n;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let m = run_length(bytes, i, b'`');
            if m == n {
                return Some(i + m);
            }
            i += m;
        } else {
            i += 1;
        }
    }
    None
}

/// Remove backslash escapes in front of ASCII punctuation
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

impl<'s, 'e> InlineParser<'s, 'e> {
    fn new(src: &'s str, env: &'e mut FootnoteEnv, depth: usize, in_link: bool) -> Self {
        InlineParser {
            src,
            pos: 0,
            pending: String::new(),
            tokens: Vec::new(),
            env,
            depth,
            in_link,
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.src.len() {
            let before = self.pos;
            for rule in InlineRule::ORDERED {
                if self.apply(rule) {
                    break;
                }
            }
            if self.pos == before {
                // Text always advances; this only guards against a stuck scan.
                self.take_char();
            }
        }
        self.flush();
        self.tokens
    }

    fn apply(&mut self, rule: InlineRule) -> bool {
        match rule {
            InlineRule::MathInline => self.math_inline(),
            InlineRule::Escape => self.escape(),
            InlineRule::Backticks => self.backticks(),
            InlineRule::Strikethrough => self.strikethrough(),
            InlineRule::Emphasis => self.emphasis(),
            InlineRule::FootnoteRef => self.footnote_ref(),
            InlineRule::Image => self.image(),
            InlineRule::Link => self.link(),
            InlineRule::Autolink => self.autolink(),
            InlineRule::HtmlInline => self.html_inline(),
            InlineRule::Newline => self.newline(),
            InlineRule::Text => self.text(),
        }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn char_before(&self, at: usize) -> Option<char> {
        self.src[..at].chars().next_back()
    }

    fn char_at(&self, at: usize) -> Option<char> {
        self.src.get(at..).and_then(|s| s.chars().next())
    }

    fn take_char(&mut self) {
        if let Some(c) = self.char_at(self.pos) {
            self.pending.push(c);
            self.pos += c.len_utf8();
        } else {
            self.pos = self.src.len();
        }
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.tokens.push(Token::text(text));
        }
    }

    fn push(&mut self, token: Token) {
        self.flush();
        self.tokens.push(token);
    }

    /// Parse `src[start..end]` as nested inline content.
    fn nested(&mut self, start: usize, end: usize, in_link: bool) -> Vec<Token> {
        let src = self.src;
        InlineParser::new(&src[start..end], &mut *self.env, self.depth + 1, in_link).run()
    }

    fn skip_spaces(&mut self) {
        let spaces = self.rest().len() - self.rest().trim_start_matches(' ').len();
        self.pos += spaces;
    }

    fn math_inline(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with('$') || self.char_before(self.pos) == Some('\\') {
            return false;
        }
        let bytes = rest.as_bytes();
        let mut i = 1;
        let mut close = None;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => break,
                b'\\' => i += 2,
                b'$' => {
                    close = Some(i);
                    break;
                }
                _ => i += 1,
            }
        }
        let Some(close) = close else {
            return false;
        };
        let content = rest[1..close].trim();
        if content.is_empty() {
            return false;
        }
        self.push(
            Token::new(TokenKind::MathInline)
                .with_content(content)
                .with_markup("$"),
        );
        self.pos += close + 1;
        true
    }

    fn escape(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with('\\') {
            return false;
        }
        match rest[1..].chars().next() {
            Some('\n') => {
                self.push(Token::new(TokenKind::Hardbreak));
                self.pos += 2;
                self.skip_spaces();
                true
            }
            Some(c) if c.is_ascii_punctuation() => {
                self.pending.push(c);
                self.pos += 1 + c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn backticks(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with('`') {
            return false;
        }
        let n = run_length(rest.as_bytes(), 0, b'`');
        let Some(end) = code_span_end(rest, 0) else {
            // An unmatched run is literal as a whole.
            self.pending.push_str(&rest[..n]);
            self.pos += n;
            return true;
        };
        let mut content = rest[n..end - n].replace('\n', " ");
        if content.len() >= 2
            && content.starts_with(' ')
            && content.ends_with(' ')
            && !content.trim().is_empty()
        {
            content = content[1..content.len() - 1].to_string();
        }
        self.push(
            Token::new(TokenKind::CodeInline)
                .with_content(content)
                .with_markup("`".repeat(n)),
        );
        self.pos += end;
        true
    }

    /// Find a closing delimiter run of `marker` able to close and at least
    /// `min_len` long, searching from `from`. Escapes and code spans are skipped.
    fn find_closer(&self, marker: u8, from: usize, min_len: usize) -> Option<(usize, usize)> {
        let bytes = self.src.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'`' => i = code_span_end(self.src, i).unwrap_or(i + 1),
                b if b == marker => {
                    let m = run_length(bytes, i, marker);
                    let (left, right) = flanking(self.char_before(i), self.char_at(i + m));
                    let can_close = match marker {
                        b'_' => right && (!left || self.char_at(i + m).is_some_and(is_punct)),
                        b'~' => right && m == 2,
                        _ => right,
                    };
                    if can_close && m >= min_len && i + m - min_len > from {
                        return Some((i, m));
                    }
                    i += m;
                }
                _ => i += 1,
            }
        }
        None
    }

    fn strikethrough(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with("~~") || run_length(rest.as_bytes(), 0, b'~') != 2 {
            return false;
        }
        if self.depth >= MAX_DEPTH || self.char_at(self.pos + 2).map_or(true, char::is_whitespace)
        {
            return false;
        }
        let start = self.pos + 2;
        let Some((close, close_len)) = self.find_closer(b'~', start, 2) else {
            return false;
        };
        let inner_end = close + close_len - 2;
        let children = self.nested(start, inner_end, self.in_link);
        self.push(Token::new(TokenKind::StrikethroughOpen).with_markup("~~"));
        self.tokens.extend(children);
        self.tokens
            .push(Token::new(TokenKind::StrikethroughClose).with_markup("~~"));
        self.pos = close + close_len;
        true
    }

    fn emphasis(&mut self) -> bool {
        let rest = self.rest();
        let marker = match rest.as_bytes().first() {
            Some(b'*') => b'*',
            Some(b'_') => b'_',
            _ => return false,
        };
        let n = run_length(rest.as_bytes(), 0, marker);
        let run = &rest[..n];
        let prev = self.char_before(self.pos);
        let (left, right) = flanking(prev, self.char_at(self.pos + n));
        let can_open = match marker {
            b'_' => left && (!right || prev.is_some_and(is_punct)),
            _ => left,
        };
        if !can_open || self.depth >= MAX_DEPTH {
            self.pending.push_str(run);
            self.pos += n;
            return true;
        }

        let start = self.pos + n;
        for size in [3usize, 2, 1] {
            if size > n {
                continue;
            }
            let Some((close, close_len)) = self.find_closer(marker, start, size) else {
                continue;
            };
            let inner_end = close + close_len - size;
            let children = self.nested(start, inner_end, self.in_link);
            let markup = (marker as char).to_string();

            // Extra opener characters stay literal.
            self.pending.push_str(&run[..n - size]);
            let (opens, closes): (Vec<TokenKind>, Vec<TokenKind>) = match size {
                3 => (
                    vec![TokenKind::EmOpen, TokenKind::StrongOpen],
                    vec![TokenKind::StrongClose, TokenKind::EmClose],
                ),
                2 => (vec![TokenKind::StrongOpen], vec![TokenKind::StrongClose]),
                _ => (vec![TokenKind::EmOpen], vec![TokenKind::EmClose]),
            };
            for kind in opens {
                let width = if kind == TokenKind::StrongOpen { 2 } else { 1 };
                self.push(Token::new(kind).with_markup(markup.repeat(width)));
            }
            self.tokens.extend(children);
            for kind in closes {
                let width = if kind == TokenKind::StrongClose { 2 } else { 1 };
                self.tokens
                    .push(Token::new(kind).with_markup(markup.repeat(width)));
            }
            self.pos = close + close_len;
            return true;
        }

        self.pending.push_str(run);
        self.pos += n;
        true
    }

    fn footnote_ref(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with("[^") {
            return false;
        }
        let Some(close) = rest.find(']') else {
            return false;
        };
        let label = &rest[2..close];
        if label.is_empty() || label.contains(char::is_whitespace) || !self.env.is_defined(label) {
            return false;
        }
        let label = label.to_string();
        let (number, sub) = self.env.reference(&label);
        self.push(
            Token::new(TokenKind::FootnoteRef).with_meta(TokenMeta::Footnote { label, number, sub }),
        );
        self.pos += close + 1;
        true
    }

    /// Parse `[text](destination "title")` with the `[` at `open`.
    fn parse_link(&self, open: usize) -> Option<LinkParts> {
        let bytes = self.src.as_bytes();
        let mut depth = 0usize;
        let mut i = open + 1;
        let mut label_end = None;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'`' => {
                    i = code_span_end(self.src, i).unwrap_or(i + 1);
                    continue;
                }
                b'[' => depth += 1,
                b']' if depth == 0 => {
                    label_end = Some(i);
                    break;
                }
                b']' => depth -= 1,
                _ => {}
            }
            i += 1;
        }
        let label_end = label_end?;
        if bytes.get(label_end + 1) != Some(&b'(') {
            return None;
        }

        let mut j = label_end + 2;
        let skip_ws = |mut k: usize| {
            while k < bytes.len() && matches!(bytes[k], b' ' | b'\t' | b'\n') {
                k += 1;
            }
            k
        };
        j = skip_ws(j);

        let href;
        if bytes.get(j) == Some(&b'<') {
            let close = self.src[j + 1..].find(['>', '\n'])? + j + 1;
            if bytes[close] != b'>' {
                return None;
            }
            href = unescape(&self.src[j + 1..close]);
            j = close + 1;
        } else {
            let start = j;
            let mut parens = 0usize;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => j += 1,
                    b'(' => parens += 1,
                    b')' if parens == 0 => break,
                    b')' => parens -= 1,
                    b' ' | b'\t' | b'\n' => break,
                    b if b < 0x20 => return None,
                    _ => {}
                }
                j += 1;
            }
            href = unescape(&self.src[start..j.min(bytes.len())]);
        }

        let after_dest = j;
        j = skip_ws(j);
        let mut title = String::new();
        if j > after_dest || bytes.get(j) == Some(&b')') {
            if let Some(&quote) = bytes.get(j).filter(|b| matches!(**b, b'"' | b'\'' | b'(')) {
                let closing = if quote == b'(' { ')' } else { quote as char };
                let close = self.src[j + 1..].find(closing)? + j + 1;
                title = unescape(&self.src[j + 1..close]);
                j = skip_ws(close + 1);
            }
        }
        if bytes.get(j) != Some(&b')') {
            return None;
        }
        Some(LinkParts {
            text_start: open + 1,
            text_end: label_end,
            href,
            title,
            end: j + 1,
        })
    }

    fn image(&mut self) -> bool {
        if !self.rest().starts_with("![") {
            return false;
        }
        let Some(parts) = self.parse_link(self.pos + 1) else {
            return false;
        };
        if !is_safe_url(&parts.href) {
            return false;
        }
        let alt = unescape(&self.src[parts.text_start..parts.text_end]);
        let mut token = Token::new(TokenKind::Image)
            .with_content(alt.clone())
            .with_attr("src", parts.href)
            .with_attr("alt", alt);
        if !parts.title.is_empty() {
            token = token.with_attr("title", parts.title);
        }
        self.push(token);
        self.pos = parts.end;
        true
    }

    fn link(&mut self) -> bool {
        if !self.rest().starts_with('[') || self.in_link || self.depth >= MAX_DEPTH {
            return false;
        }
        let Some(parts) = self.parse_link(self.pos) else {
            return false;
        };
        if !is_safe_url(&parts.href) {
            return false;
        }
        let children = self.nested(parts.text_start, parts.text_end, true);
        let mut open = Token::new(TokenKind::LinkOpen).with_attr("href", parts.href);
        if !parts.title.is_empty() {
            open = open.with_attr("title", parts.title);
        }
        self.push(open);
        self.tokens.extend(children);
        self.tokens.push(Token::new(TokenKind::LinkClose));
        self.pos = parts.end;
        true
    }

    fn autolink(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with('<') || self.in_link {
            return false;
        }
        let (target, href, len) = if let Some(caps) = URL_AUTOLINK.captures(rest) {
            let target = caps[1].to_string();
            (target.clone(), target, caps[0].len())
        } else if let Some(caps) = EMAIL_AUTOLINK.captures(rest) {
            let target = caps[1].to_string();
            (target.clone(), format!("mailto:{target}"), caps[0].len())
        } else {
            return false;
        };
        if !is_safe_url(&href) {
            return false;
        }
        self.push(
            Token::new(TokenKind::LinkOpen)
                .with_attr("href", href)
                .with_markup("autolink"),
        );
        self.tokens.push(Token::text(target));
        self.tokens
            .push(Token::new(TokenKind::LinkClose).with_markup("autolink"));
        self.pos += len;
        true
    }

    fn html_inline(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with('<') {
            return false;
        }
        let Some(len) = match_html_tag(rest) else {
            return false;
        };
        self.push(Token::new(TokenKind::HtmlInline).with_content(&rest[..len]));
        self.pos += len;
        true
    }

    fn newline(&mut self) -> bool {
        if !self.rest().starts_with('\n') {
            return false;
        }
        let kept = self.pending.trim_end_matches(' ').len();
        let trailing = self.pending.len() - kept;
        self.pending.truncate(kept);
        let kind = if trailing >= 2 {
            TokenKind::Hardbreak
        } else {
            TokenKind::Softbreak
        };
        self.push(Token::new(kind));
        self.pos += 1;
        self.skip_spaces();
        true
    }

    fn text(&mut self) -> bool {
        let rest = self.rest();
        let len = rest
            .find(['$', '\\', '`', '~', '*', '_', '[', '!', '<', '\n'])
            .unwrap_or(rest.len());
        if len == 0 {
            self.take_char();
        } else {
            self.pending.push_str(&rest[..len]);
            self.pos += len;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<Token> {
        parse_inline(src, &mut FootnoteEnv::default())
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn inline_math_is_recognized() {
        let tokens = parse("Euler: $e^{i\\pi} + 1 = 0$!");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Text, TokenKind::MathInline, TokenKind::Text]
        );
        assert_eq!(tokens[1].content, "e^{i\\pi} + 1 = 0");
    }

    #[test]
    fn unmatched_or_empty_dollars_stay_literal() {
        let tokens = parse("costs $5");
        assert_eq!(kinds(&tokens), vec![TokenKind::Text]);
        assert_eq!(tokens[0].content, "costs $5");

        let tokens = parse("$ $ and \\$x");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn math_does_not_cross_lines() {
        let tokens = parse("a $b\nc$ d");
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::MathInline));
    }

    #[test]
    fn emphasis_and_strong() {
        let tokens = parse("**bold** and *it* and ***both***");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::StrongOpen,
                TokenKind::Text,
                TokenKind::StrongClose,
                TokenKind::Text,
                TokenKind::EmOpen,
                TokenKind::Text,
                TokenKind::EmClose,
                TokenKind::Text,
                TokenKind::EmOpen,
                TokenKind::StrongOpen,
                TokenKind::Text,
                TokenKind::StrongClose,
                TokenKind::EmClose,
            ]
        );
    }

    #[test]
    fn intraword_underscores_are_literal() {
        let tokens = parse("snake_case_name");
        assert_eq!(kinds(&tokens), vec![TokenKind::Text]);
        assert_eq!(tokens[0].content, "snake_case_name");
    }

    #[test]
    fn nested_emphasis_inside_strong() {
        let tokens = parse("**a *b***");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::StrongOpen,
                TokenKind::Text,
                TokenKind::EmOpen,
                TokenKind::Text,
                TokenKind::EmClose,
                TokenKind::StrongClose,
            ]
        );
    }

    #[test]
    fn strikethrough_and_code() {
        let tokens = parse("~~gone~~ `a*b*`");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::StrikethroughOpen,
                TokenKind::Text,
                TokenKind::StrikethroughClose,
                TokenKind::Text,
                TokenKind::CodeInline,
            ]
        );
        assert_eq!(tokens[4].content, "a*b*");
    }

    #[test]
    fn links_and_images() {
        let tokens = parse(r#"[site](https://example.com "Home") ![logo](/l.png)"#);
        assert_eq!(tokens[0].kind, TokenKind::LinkOpen);
        assert_eq!(tokens[0].attr("href"), Some("https://example.com"));
        assert_eq!(tokens[0].attr("title"), Some("Home"));
        assert_eq!(tokens[3].kind, TokenKind::Text);
        assert_eq!(tokens[4].kind, TokenKind::Image);
        assert_eq!(tokens[4].attr("alt"), Some("logo"));
    }

    #[test]
    fn unsafe_links_stay_text() {
        let tokens = parse("[x](javascript:alert(1))");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
        assert!(!is_safe_url("  JavaScript:void(0)"));
        assert!(is_safe_url("data:image/png;base64,AAAA"));
        assert!(!is_safe_url("data:text/html;base64,AAAA"));
    }

    #[test]
    fn autolinks_and_inline_html() {
        let tokens = parse("<https://a.io> <b>bold</b> <me@x.org>");
        assert_eq!(tokens[0].attr("href"), Some("https://a.io"));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::HtmlInline && t.content == "<b>"));
        assert!(tokens
            .iter()
            .any(|t| t.attr("href") == Some("mailto:me@x.org")));
    }

    #[test]
    fn breaks() {
        let tokens = parse("a  \nb\nc\\\nd");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Text,
                TokenKind::Hardbreak,
                TokenKind::Text,
                TokenKind::Softbreak,
                TokenKind::Text,
                TokenKind::Hardbreak,
                TokenKind::Text,
            ]
        );
        assert_eq!(tokens[0].content, "a");
    }

    #[test]
    fn footnote_refs_need_a_definition() {
        let mut env = FootnoteEnv::new(["n".to_string()]);
        let tokens = parse_inline("see[^n] and [^missing]", &mut env);
        assert_eq!(tokens[1].kind, TokenKind::FootnoteRef);
        assert_eq!(tokens[2].content, " and [^missing]");
    }

    #[test]
    fn escapes_produce_literal_punctuation() {
        let tokens = parse(r"\*not\* \[x\]");
        assert_eq!(kinds(&tokens), vec![TokenKind::Text]);
        assert_eq!(tokens[0].content, "*not* [x]");
    }
}
