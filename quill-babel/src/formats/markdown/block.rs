//! Block tokenizer
//!
//! Line based. A region (the whole document, or the stripped content of a
//! blockquote, list item, admonition or footnote) is scanned top to bottom;
//! at each non-blank line the rules of [`BlockRule::ORDERED`] are tried in
//! turn and the first one that matches emits its tokens and reports the line
//! it stopped at. Rules check their whole extent before emitting anything, so
//! a failed rule leaves no trace. `Paragraph` always matches.
//!
//! Inline content is not parsed here: `inline` tokens carry their raw text
//! and are filled in by the inline pass once all footnote definitions are
//! known.

use super::footnote::FootnoteDefinition;
use super::inline::match_html_tag;
use crate::common::admonition::AdmonitionKind;
use crate::common::fence::{is_fence_close, parse_fence_open, FenceOpen};
use crate::common::tables::{parse_divider, split_row};
use crate::ir::{Token, TokenKind, TokenMeta};

/// Nesting limit for blockquotes, lists and footnote bodies
const MAX_DEPTH: usize = 16;

/// Tag names that open an HTML block ending at the next blank line
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

/// Tags whose content is raw up to the matching close tag
const RAW_TAGS: &[&str] = &["script", "pre", "style", "textarea"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockRule {
    Fence,
    MathBlock,
    Container,
    IndentedCode,
    Heading,
    ThematicBreak,
    Blockquote,
    FootnoteDef,
    List,
    Table,
    DefinitionList,
    HtmlBlock,
    Paragraph,
}

impl BlockRule {
    /// Priority order. Math blocks and containers come before indented code,
    /// the literal-block fallback.
    const ORDERED: [BlockRule; 13] = [
        BlockRule::Fence,
        BlockRule::MathBlock,
        BlockRule::Container,
        BlockRule::IndentedCode,
        BlockRule::Heading,
        BlockRule::ThematicBreak,
        BlockRule::Blockquote,
        BlockRule::FootnoteDef,
        BlockRule::List,
        BlockRule::Table,
        BlockRule::DefinitionList,
        BlockRule::HtmlBlock,
        BlockRule::Paragraph,
    ];
}

/// Where a region sits in the document
#[derive(Debug, Clone, Copy, Default)]
struct Region {
    /// Source line of the region's first line
    base: usize,
    in_container: bool,
    /// Paragraphs are hidden (tight list items, tight definitions)
    tight: bool,
    depth: usize,
}

impl Region {
    fn nested(self, base: usize) -> Region {
        Region {
            base,
            tight: false,
            depth: self.depth + 1,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HtmlBlockEnd {
    Comment,
    RawTag(&'static str),
    BlankLine,
}

struct ListMarker<'a> {
    ordered: bool,
    /// Bullet character, or the delimiter (`.`/`)`) of an ordered marker
    ch: char,
    number: u32,
    content_offset: usize,
    rest: &'a str,
}

impl ListMarker<'_> {
    fn continues(&self, other: &ListMarker<'_>) -> bool {
        self.ordered == other.ordered && self.ch == other.ch
    }
}

struct ListItem<'a> {
    start: usize,
    lines: Vec<&'a str>,
    task: Option<bool>,
}

/// Block tokens of a whole document plus the footnote definitions found.
pub(crate) fn parse_blocks(source: &str) -> (Vec<Token>, Vec<FootnoteDefinition>) {
    let owned: Vec<String> = source.lines().map(expand_leading_tabs).collect();
    let lines: Vec<&str> = owned.iter().map(String::as_str).collect();
    let mut parser = BlockParser::default();
    parser.parse_region(&lines, Region::default());
    (parser.tokens, parser.footnotes)
}

#[derive(Default)]
struct BlockParser {
    tokens: Vec<Token>,
    footnotes: Vec<FootnoteDefinition>,
}

impl BlockParser {
    fn parse_region(&mut self, lines: &[&str], region: Region) {
        let mut i = 0;
        while i < lines.len() {
            if is_blank(lines[i]) {
                i += 1;
                continue;
            }
            let next = BlockRule::ORDERED
                .into_iter()
                .find_map(|rule| self.apply(rule, lines, i, region));
            i = match next {
                Some(end) if end > i => end,
                _ => i + 1,
            };
        }
    }

    fn apply(&mut self, rule: BlockRule, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        match rule {
            BlockRule::Fence => self.fence(lines, start, region),
            BlockRule::MathBlock => self.math_block(lines, start, region),
            BlockRule::Container => self.container(lines, start, region),
            BlockRule::IndentedCode => self.indented_code(lines, start, region),
            BlockRule::Heading => self.heading(lines, start, region),
            BlockRule::ThematicBreak => self.thematic_break(lines, start, region),
            BlockRule::Blockquote => self.blockquote(lines, start, region),
            BlockRule::FootnoteDef => self.footnote_def(lines, start, region),
            BlockRule::List => self.list(lines, start, region),
            BlockRule::Table => self.table(lines, start, region),
            BlockRule::DefinitionList => self.definition_list(lines, start, region),
            BlockRule::HtmlBlock => self.html_block(lines, start, region),
            BlockRule::Paragraph => self.paragraph(lines, start, region),
        }
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn push_inline(&mut self, content: &str, map: (usize, usize)) {
        self.push(
            Token::new(TokenKind::Inline)
                .with_content(content)
                .with_map(map.0, map.1),
        );
    }

    fn fence(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        let open = parse_fence_open(lines[start]).filter(|open| open.indent <= 3)?;
        let mut body = String::new();
        let mut end = start + 1;
        let mut closed = false;
        while end < lines.len() {
            if indent_of(lines[end]) <= 3 && is_fence_close(lines[end], &open) {
                closed = true;
                break;
            }
            body.push_str(strip_indent(lines[end], open.indent));
            body.push('\n');
            end += 1;
        }
        // An unclosed fence runs to the end of its region.
        let next = if closed { end + 1 } else { end };
        let markup: String = std::iter::repeat(open.ch).take(open.len).collect();
        self.push(
            Token::new(TokenKind::Fence)
                .with_content(body)
                .with_markup(markup)
                .with_info(open.info)
                .with_map(region.base + start, region.base + next),
        );
        Some(next)
    }

    fn math_block(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        let rest = lines[start].trim().strip_prefix("$$")?.trim();

        if rest.len() >= 2 && rest.ends_with("$$") {
            let content = rest[..rest.len() - 2].trim();
            self.push_math(content.to_string(), region.base + start, region.base + start + 1);
            return Some(start + 1);
        }

        let mut content_lines: Vec<&str> = Vec::new();
        if !rest.is_empty() {
            content_lines.push(rest);
        }
        let mut end = start + 1;
        while end < lines.len() {
            let trimmed = lines[end].trim();
            if trimmed.starts_with("$$") || trimmed.ends_with("$$") {
                let extra = trimmed.strip_suffix("$$").unwrap_or(trimmed);
                let extra = extra.strip_prefix("$$").unwrap_or(extra).trim();
                if !extra.is_empty() {
                    content_lines.push(extra);
                }
                let content = content_lines.join("\n");
                self.push_math(content, region.base + start, region.base + end + 1);
                return Some(end + 1);
            }
            content_lines.push(lines[end]);
            end += 1;
        }
        // Unterminated: the `$$` text is left to the paragraph rule.
        None
    }

    fn push_math(&mut self, content: String, from: usize, to: usize) {
        self.push(
            Token::new(TokenKind::MathBlock)
                .with_content(content)
                .with_markup("$$")
                .with_map(from, to),
        );
    }

    fn container(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        if region.in_container {
            return None;
        }
        let (colons, kind, title) = container_opener(lines[start])?;

        let mut end = start + 1;
        let mut fence: Option<FenceOpen<'_>> = None;
        let mut in_math = false;
        let close = loop {
            if end >= lines.len() {
                return None;
            }
            let line = lines[end];
            let trimmed = line.trim();
            if let Some(open) = &fence {
                if is_fence_close(line, open) {
                    fence = None;
                }
            } else if in_math {
                if trimmed.starts_with("$$") || trimmed.ends_with("$$") {
                    in_math = false;
                }
            } else if let Some(open) = parse_fence_open(line) {
                fence = Some(open);
            } else if let Some(after) = trimmed.strip_prefix("$$") {
                let after = after.trim();
                in_math = !(after.len() >= 2 && after.ends_with("$$"));
            } else if is_container_close(trimmed, colons) {
                break end;
            }
            end += 1;
        };

        let markup = ":".repeat(colons);
        self.push(
            Token::new(TokenKind::ContainerOpen)
                .with_content(title)
                .with_info(kind.name())
                .with_markup(markup.clone())
                .with_meta(TokenMeta::Admonition(kind))
                .with_map(region.base + start, region.base + close + 1),
        );
        let inner = Region {
            in_container: true,
            ..region.nested(region.base + start + 1)
        };
        self.parse_region(&lines[start + 1..close], inner);
        self.push(
            Token::new(TokenKind::ContainerClose)
                .with_info(kind.name())
                .with_markup(markup)
                .with_meta(TokenMeta::Admonition(kind)),
        );
        Some(close + 1)
    }

    fn indented_code(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        if indent_of(lines[start]) < 4 {
            return None;
        }
        let mut last = start;
        let mut end = start;
        while end < lines.len() {
            if is_blank(lines[end]) {
                end += 1;
                continue;
            }
            if indent_of(lines[end]) < 4 {
                break;
            }
            last = end;
            end += 1;
        }
        let body: String = lines[start..=last]
            .iter()
            .map(|line| format!("{}\n", strip_indent(line, 4)))
            .collect();
        self.push(
            Token::new(TokenKind::CodeBlock)
                .with_content(body)
                .with_map(region.base + start, region.base + last + 1),
        );
        Some(last + 1)
    }

    fn heading(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        let (level, text) = atx_heading(lines[start])?;
        let map = (region.base + start, region.base + start + 1);
        let meta = TokenMeta::Heading { level };
        let markup = "#".repeat(level as usize);
        self.push(
            Token::new(TokenKind::HeadingOpen)
                .with_markup(markup.clone())
                .with_meta(meta.clone())
                .with_map(map.0, map.1),
        );
        self.push_inline(text, map);
        self.push(
            Token::new(TokenKind::HeadingClose)
                .with_markup(markup)
                .with_meta(meta),
        );
        Some(start + 1)
    }

    fn thematic_break(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        if !is_thematic_break(lines[start]) {
            return None;
        }
        let marker = lines[start].trim().chars().next().unwrap_or('-');
        self.push(
            Token::new(TokenKind::Hr)
                .with_markup(marker.to_string().repeat(3))
                .with_map(region.base + start, region.base + start + 1),
        );
        Some(start + 1)
    }

    fn blockquote(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        if region.depth >= MAX_DEPTH {
            return None;
        }
        strip_quote_marker(lines[start])?;
        let mut inner: Vec<&str> = Vec::new();
        let mut end = start;
        while end < lines.len() {
            let line = lines[end];
            if let Some(stripped) = strip_quote_marker(line) {
                inner.push(stripped);
            } else if !is_blank(line)
                && inner.last().is_some_and(|prev| !is_blank(prev))
                && !interrupts_paragraph(line)
            {
                // Lazy continuation
                inner.push(line);
            } else {
                break;
            }
            end += 1;
        }

        self.push(
            Token::new(TokenKind::BlockquoteOpen)
                .with_markup(">")
                .with_map(region.base + start, region.base + end),
        );
        self.parse_region(&inner, region.nested(region.base + start));
        self.push(Token::new(TokenKind::BlockquoteClose).with_markup(">"));
        Some(end)
    }

    fn footnote_def(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        if region.depth >= MAX_DEPTH || indent_of(lines[start]) > 3 {
            return None;
        }
        let (label, first) = footnote_label(lines[start].trim_start())?;
        let mut body: Vec<&str> = vec![first.trim_start()];
        let mut end = start + 1;
        while end < lines.len() {
            let line = lines[end];
            if is_blank(line) {
                match next_non_blank(lines, end) {
                    Some(next) if indent_of(lines[next]) >= 4 => {
                        body.extend(std::iter::repeat("").take(next - end));
                        end = next;
                        continue;
                    }
                    _ => break,
                }
            }
            if indent_of(line) >= 4 {
                body.push(strip_indent(line, 4));
            } else if body.last().is_some_and(|prev| !is_blank(prev)) && !interrupts_paragraph(line)
            {
                body.push(line);
            } else {
                break;
            }
            end += 1;
        }

        let saved = std::mem::take(&mut self.tokens);
        self.parse_region(&body, region.nested(region.base + start));
        let tokens = std::mem::replace(&mut self.tokens, saved);
        if !self.footnotes.iter().any(|def| def.label == label) {
            self.footnotes.push(FootnoteDefinition {
                label: label.to_string(),
                tokens,
            });
        }
        Some(end)
    }

    fn list(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        if region.depth >= MAX_DEPTH {
            return None;
        }
        let first = parse_list_marker(lines[start])?;
        let mut items: Vec<ListItem<'_>> = Vec::new();
        let mut loose = false;
        let mut i = start;

        loop {
            let marker = match parse_list_marker(lines[i]) {
                Some(marker) if marker.continues(&first) => marker,
                _ => break,
            };
            let item_start = i;
            let mut item_lines = vec![marker.rest];
            i += 1;
            while i < lines.len() {
                let line = lines[i];
                if is_blank(line) {
                    match next_non_blank(lines, i) {
                        Some(next) if indent_of(lines[next]) >= marker.content_offset => {
                            item_lines.extend(std::iter::repeat("").take(next - i));
                            loose = true;
                            i = next;
                            continue;
                        }
                        _ => break,
                    }
                }
                if indent_of(line) >= marker.content_offset {
                    item_lines.push(&line[marker.content_offset..]);
                } else if parse_list_marker(line).is_some() || is_thematic_break(line) {
                    break;
                } else if item_lines.last().is_some_and(|prev| !is_blank(prev))
                    && !interrupts_paragraph(line)
                {
                    item_lines.push(line.trim_start());
                } else {
                    break;
                }
                i += 1;
            }

            let (task, first_line) = task_marker(item_lines[0]);
            item_lines[0] = first_line;
            items.push(ListItem {
                start: item_start,
                lines: item_lines,
                task,
            });

            match next_non_blank(lines, i) {
                Some(next)
                    if !is_thematic_break(lines[next])
                        && parse_list_marker(lines[next]).is_some_and(|m| m.continues(&first)) =>
                {
                    if next > i {
                        loose = true;
                    }
                    i = next;
                }
                _ => break,
            }
        }

        let (open, close) = if first.ordered {
            (TokenKind::OrderedListOpen, TokenKind::OrderedListClose)
        } else {
            (TokenKind::BulletListOpen, TokenKind::BulletListClose)
        };
        let markup = first.ch.to_string();
        let mut open_token = Token::new(open)
            .with_markup(markup.clone())
            .with_map(region.base + start, region.base + i);
        if first.ordered {
            open_token = open_token.with_meta(TokenMeta::OrderedStart(first.number));
        }
        self.push(open_token);

        for item in items {
            let mut item_open = Token::new(TokenKind::ListItemOpen)
                .with_markup(markup.clone())
                .with_map(region.base + item.start, region.base + item.start + item.lines.len());
            if let Some(checked) = item.task {
                item_open = item_open.with_meta(TokenMeta::Task { checked });
            }
            self.push(item_open);
            let inner = Region {
                tight: !loose,
                ..region.nested(region.base + item.start)
            };
            self.parse_region(&item.lines, inner);
            self.push(Token::new(TokenKind::ListItemClose).with_markup(markup.clone()));
        }

        self.push(Token::new(close).with_markup(markup));
        Some(i)
    }

    fn table(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        let columns = table_start(lines, start)?;
        let (header, alignments) = columns;
        let mut end = start + 2;
        let mut rows = Vec::new();
        while end < lines.len() && !is_blank(lines[end]) && !interrupts_paragraph(lines[end]) {
            rows.push(split_row(lines[end]));
            end += 1;
        }

        self.push(Token::new(TokenKind::TableOpen).with_map(region.base + start, region.base + end));
        self.push(Token::new(TokenKind::TheadOpen));
        self.push(Token::new(TokenKind::TrOpen));
        for (cell, alignment) in header.iter().zip(&alignments) {
            self.push(Token::new(TokenKind::ThOpen).with_meta(TokenMeta::Align(*alignment)));
            self.push_inline(cell, (region.base + start, region.base + start + 1));
            self.push(Token::new(TokenKind::ThClose));
        }
        self.push(Token::new(TokenKind::TrClose));
        self.push(Token::new(TokenKind::TheadClose));

        if !rows.is_empty() {
            self.push(Token::new(TokenKind::TbodyOpen));
            for (offset, row) in rows.iter().enumerate() {
                let line = region.base + start + 2 + offset;
                self.push(Token::new(TokenKind::TrOpen));
                for (column, alignment) in alignments.iter().enumerate() {
                    let cell = row.get(column).map(String::as_str).unwrap_or("");
                    self.push(Token::new(TokenKind::TdOpen).with_meta(TokenMeta::Align(*alignment)));
                    self.push_inline(cell, (line, line + 1));
                    self.push(Token::new(TokenKind::TdClose));
                }
                self.push(Token::new(TokenKind::TrClose));
            }
            self.push(Token::new(TokenKind::TbodyClose));
        }
        self.push(Token::new(TokenKind::TableClose));
        Some(end)
    }

    fn definition_list(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        if region.depth >= MAX_DEPTH || definition_marker(lines[start]).is_some() {
            return None;
        }
        let mut first_definition = definition_after(lines, start)?;
        let mut tight = first_definition == start + 1;

        // (term line, [(definition line, body)])
        let mut groups: Vec<(usize, Vec<(usize, Vec<&str>)>)> = Vec::new();
        let mut term = start;
        let end = loop {
            let mut definitions = Vec::new();
            let mut j = first_definition;
            loop {
                let Some(first) = definition_marker(lines[j]) else {
                    break;
                };
                let definition_line = j;
                let mut body = vec![first];
                j += 1;
                while j < lines.len() {
                    let line = lines[j];
                    if is_blank(line) {
                        match next_non_blank(lines, j) {
                            Some(next)
                                if indent_of(lines[next]) >= 2
                                    && definition_marker(lines[next]).is_none() =>
                            {
                                body.extend(std::iter::repeat("").take(next - j));
                                tight = false;
                                j = next;
                                continue;
                            }
                            _ => break,
                        }
                    }
                    if definition_marker(line).is_some() {
                        break;
                    }
                    if indent_of(line) >= 2 {
                        body.push(strip_indent(line, 2));
                    } else if body.last().is_some_and(|prev| !is_blank(prev))
                        && !interrupts_paragraph(line)
                        && definition_after(lines, j).is_none()
                    {
                        body.push(line);
                    } else {
                        break;
                    }
                    j += 1;
                }
                definitions.push((definition_line, body));

                let next = skip_one_blank(lines, j);
                if next < lines.len() && definition_marker(lines[next]).is_some() {
                    if next > j {
                        tight = false;
                    }
                    j = next;
                } else {
                    break;
                }
            }
            groups.push((term, definitions));

            let next = skip_one_blank(lines, j);
            let another_term = next < lines.len()
                && !is_blank(lines[next])
                && definition_marker(lines[next]).is_none()
                && !interrupts_paragraph(lines[next]);
            match another_term.then(|| definition_after(lines, next)).flatten() {
                Some(definition) => {
                    term = next;
                    first_definition = definition;
                }
                None => break j,
            }
        };

        self.push(Token::new(TokenKind::DlOpen).with_map(region.base + start, region.base + end));
        for (term_line, definitions) in groups {
            let map = (region.base + term_line, region.base + term_line + 1);
            self.push(Token::new(TokenKind::DtOpen).with_map(map.0, map.1));
            self.push_inline(lines[term_line].trim(), map);
            self.push(Token::new(TokenKind::DtClose));
            for (definition_line, body) in definitions {
                self.push(
                    Token::new(TokenKind::DdOpen)
                        .with_markup(":")
                        .with_map(region.base + definition_line, region.base + definition_line + body.len()),
                );
                let inner = Region {
                    tight,
                    ..region.nested(region.base + definition_line)
                };
                self.parse_region(&body, inner);
                self.push(Token::new(TokenKind::DdClose));
            }
        }
        self.push(Token::new(TokenKind::DlClose));
        Some(end)
    }

    fn html_block(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        let kind = html_block_start(lines[start], false)?;
        let end = match kind {
            HtmlBlockEnd::Comment => (start..lines.len())
                .find(|&i| lines[i].contains("-->"))
                .map_or(lines.len(), |i| i + 1),
            HtmlBlockEnd::RawTag(tag) => {
                let close = format!("</{tag}>");
                (start..lines.len())
                    .find(|&i| lines[i].to_ascii_lowercase().contains(&close))
                    .map_or(lines.len(), |i| i + 1)
            }
            HtmlBlockEnd::BlankLine => (start..lines.len())
                .find(|&i| is_blank(lines[i]))
                .unwrap_or(lines.len()),
        };
        let mut content = lines[start..end].join("\n");
        content.push('\n');
        self.push(
            Token::new(TokenKind::HtmlBlock)
                .with_content(content)
                .with_map(region.base + start, region.base + end),
        );
        Some(end)
    }

    fn paragraph(&mut self, lines: &[&str], start: usize, region: Region) -> Option<usize> {
        let mut end = start + 1;
        let mut setext = None;
        while end < lines.len() {
            let line = lines[end];
            if is_blank(line) {
                break;
            }
            if let Some(level) = setext_level(line) {
                setext = Some(level);
                break;
            }
            if interrupts_paragraph(line)
                || table_start(lines, end).is_some()
                || definition_marker(lines.get(end + 1).copied().unwrap_or("")).is_some()
            {
                break;
            }
            end += 1;
        }

        let content = join_paragraph(&lines[start..end]);
        let map = (region.base + start, region.base + end);

        if let Some(level) = setext {
            let meta = TokenMeta::Heading { level };
            let markup = if level == 1 { "=" } else { "-" };
            self.push(
                Token::new(TokenKind::HeadingOpen)
                    .with_markup(markup)
                    .with_meta(meta.clone())
                    .with_map(map.0, map.1 + 1),
            );
            self.push_inline(&content, map);
            self.push(
                Token::new(TokenKind::HeadingClose)
                    .with_markup(markup)
                    .with_meta(meta),
            );
            return Some(end + 1);
        }

        self.push(
            Token::new(TokenKind::ParagraphOpen)
                .hidden(region.tight)
                .with_map(map.0, map.1),
        );
        self.push_inline(&content, map);
        self.push(Token::new(TokenKind::ParagraphClose).hidden(region.tight));
        Some(end)
    }
}

fn expand_leading_tabs(line: &str) -> String {
    if !line.starts_with([' ', '\t']) || !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + 8);
    let mut column = 0;
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        match c {
            ' ' => {
                out.push(' ');
                column += 1;
            }
            '\t' => {
                let width = 4 - column % 4;
                out.extend(std::iter::repeat(' ').take(width));
                column += width;
            }
            _ => break,
        }
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Remove up to `n` leading spaces
fn strip_indent(line: &str, n: usize) -> &str {
    let remove = indent_of(line).min(n);
    &line[remove..]
}

fn next_non_blank(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| !is_blank(lines[i]))
}

fn skip_one_blank(lines: &[&str], at: usize) -> usize {
    if at < lines.len() && is_blank(lines[at]) {
        at + 1
    } else {
        at
    }
}

fn join_paragraph(lines: &[&str]) -> String {
    let joined = lines
        .iter()
        .map(|line| line.trim_start())
        .collect::<Vec<_>>()
        .join("\n");
    joined.trim_end().to_string()
}

/// `::: <kind> [title]` with three or more colons
fn container_opener(line: &str) -> Option<(usize, AdmonitionKind, &str)> {
    if indent_of(line) > 3 {
        return None;
    }
    let trimmed = line.trim();
    let colons = trimmed.chars().take_while(|c| *c == ':').count();
    if colons < 3 {
        return None;
    }
    let rest = trimmed[colons..].trim();
    let (name, title) = match rest.split_once(char::is_whitespace) {
        Some((name, title)) => (name, title.trim()),
        None => (rest, ""),
    };
    let kind = AdmonitionKind::from_name(name)?;
    Some((colons, kind, title))
}

fn is_container_close(trimmed: &str, colons: usize) -> bool {
    trimmed.len() >= colons && trimmed.chars().all(|c| c == ':')
}

fn atx_heading(line: &str) -> Option<(u8, &str)> {
    if indent_of(line) > 3 {
        return None;
    }
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    let text = rest.trim();
    let without_closing = text.trim_end_matches('#');
    let text = if without_closing.is_empty() {
        ""
    } else if without_closing.ends_with(' ') {
        without_closing.trim_end()
    } else {
        text
    };
    Some((level as u8, text))
}

fn is_thematic_break(line: &str) -> bool {
    if indent_of(line) > 3 {
        return false;
    }
    let compact: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && matches!(compact[0], '-' | '*' | '_')
        && compact.iter().all(|c| *c == compact[0])
}

fn setext_level(line: &str) -> Option<u8> {
    if indent_of(line) > 3 {
        return None;
    }
    let trimmed = line.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if !trimmed.is_empty() && trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn strip_quote_marker(line: &str) -> Option<&str> {
    if indent_of(line) > 3 {
        return None;
    }
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// `[^label]:` at the start of a line; returns the label and the rest
fn footnote_label(trimmed: &str) -> Option<(&str, &str)> {
    let rest = trimmed.strip_prefix("[^")?;
    let close = rest.find(']')?;
    let label = &rest[..close];
    if label.is_empty() || label.contains(char::is_whitespace) {
        return None;
    }
    let after = rest[close + 1..].strip_prefix(':')?;
    Some((label, after))
}

fn parse_list_marker(line: &str) -> Option<ListMarker<'_>> {
    let indent = indent_of(line);
    if indent > 3 {
        return None;
    }
    let trimmed = &line[indent..];
    let first = trimmed.chars().next()?;
    let (ordered, ch, number, marker_len) = if matches!(first, '-' | '*' | '+') {
        (false, first, 0, 1)
    } else {
        let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        let delimiter = trimmed[digits..].chars().next()?;
        if delimiter != '.' && delimiter != ')' {
            return None;
        }
        let number = trimmed[..digits].parse().ok()?;
        (true, delimiter, number, digits + 1)
    };

    let after = &trimmed[marker_len..];
    let marker_end = indent + marker_len;
    if after.trim().is_empty() {
        return Some(ListMarker {
            ordered,
            ch,
            number,
            content_offset: marker_end + 1,
            rest: "",
        });
    }
    if !after.starts_with(' ') {
        return None;
    }
    let spaces = indent_of(after);
    let (content_offset, rest) = if spaces > 4 {
        // Indented code right after the marker
        (marker_end + 1, &after[1..])
    } else {
        (marker_end + spaces, &after[spaces..])
    };
    Some(ListMarker {
        ordered,
        ch,
        number,
        content_offset,
        rest,
    })
}

fn task_marker(line: &str) -> (Option<bool>, &str) {
    for (prefix, checked) in [("[ ]", false), ("[x]", true), ("[X]", true)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            if rest.is_empty() || rest.starts_with(' ') {
                return (Some(checked), rest.trim_start());
            }
        }
    }
    (None, line)
}

/// A table header at `start` followed by a matching divider row
fn table_start(lines: &[&str], start: usize) -> Option<(Vec<String>, Vec<crate::common::tables::Alignment>)> {
    let header = lines[start];
    let divider = *lines.get(start + 1)?;
    if indent_of(header) > 3 || !header.contains('|') || !divider.contains('|') {
        return None;
    }
    let alignments = parse_divider(divider, 1)?;
    let cells = split_row(header);
    (cells.len() == alignments.len()).then_some((cells, alignments))
}

fn definition_marker(line: &str) -> Option<&str> {
    if indent_of(line) > 3 {
        return None;
    }
    let rest = line.trim_start().strip_prefix(':')?;
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(' ') {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Index of the first definition line belonging to a term at `term`
fn definition_after(lines: &[&str], term: usize) -> Option<usize> {
    let next = term + 1;
    if lines.get(next).is_some_and(|line| definition_marker(line).is_some()) {
        return Some(next);
    }
    let after_blank = term + 2;
    if lines.get(next).is_some_and(|line| is_blank(line))
        && lines
            .get(after_blank)
            .is_some_and(|line| definition_marker(line).is_some())
    {
        return Some(after_blank);
    }
    None
}

fn html_block_start(line: &str, interrupting: bool) -> Option<HtmlBlockEnd> {
    if indent_of(line) > 3 {
        return None;
    }
    let trimmed = line.trim();
    if !trimmed.starts_with('<') {
        return None;
    }
    if trimmed.starts_with("<!--") {
        return Some(HtmlBlockEnd::Comment);
    }

    let lower = trimmed.to_ascii_lowercase();
    let name_start = if lower.starts_with("</") { 2 } else { 1 };
    let name: String = lower[name_start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() {
        return None;
    }
    let after = lower[name_start + name.len()..].chars().next();
    let boundary = matches!(after, None | Some(' ' | '>' | '/' | '\t'));
    if !boundary {
        return None;
    }

    if name_start == 1 {
        if let Some(tag) = RAW_TAGS.iter().find(|tag| **tag == name) {
            return Some(HtmlBlockEnd::RawTag(tag));
        }
    }
    if BLOCK_TAGS.contains(&name.as_str()) {
        return Some(HtmlBlockEnd::BlankLine);
    }
    // A lone complete tag opens a block too, but cannot interrupt a paragraph.
    if !interrupting && match_html_tag(trimmed) == Some(trimmed.len()) {
        return Some(HtmlBlockEnd::BlankLine);
    }
    None
}

/// Whether `line` starts a block that ends a running paragraph.
fn interrupts_paragraph(line: &str) -> bool {
    if is_blank(line) || indent_of(line) > 3 {
        return false;
    }
    let trimmed = line.trim_start();
    parse_fence_open(line).is_some()
        || trimmed.starts_with("$$")
        || container_opener(line).is_some()
        || atx_heading(line).is_some()
        || is_thematic_break(line)
        || trimmed.starts_with('>')
        || footnote_label(trimmed).is_some()
        || parse_list_marker(line)
            .is_some_and(|m| !m.rest.is_empty() && (!m.ordered || m.number == 1))
        || html_block_start(line, true).is_some()
}
