//! Markdown serialization (HTML → Markdown)
//!
//! Converts rendered or editor-produced HTML back to the extended dialect.
//! Pipeline: HTML string → RcDom → Comrak AST → Markdown string
//!
//! Plain CommonMark constructs become regular comrak nodes. Dialect syntax
//! comrak knows nothing about (math, admonition fences, footnotes, task
//! markers, definition markers) is emitted as raw HTML nodes, which comrak
//! writes out verbatim instead of escaping.

use crate::common::admonition::AdmonitionKind;
use crate::common::codec::{NodeConfig, CONFIG_ATTR};
use crate::common::tables::Alignment;
use crate::error::ConvertError;
use crate::formats::html::parser::{
    attr, body, classes, element_children, element_name, has_attr, has_class, outer_html,
    parse_html, text_content,
};
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeTable, NodeValue, TableAlignment,
};
use comrak::{format_commonmark, Arena, ComrakOptions, ListStyleType};
use markup5ever_rcdom::{Handle, NodeData};
use std::cell::RefCell;

/// Nesting limit for the DOM walk; deeper subtrees are flattened to text
const MAX_DEPTH: usize = 64;

/// Elements that start a block of their own
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "details", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Embedded media, kept as raw HTML
const MEDIA_ELEMENTS: &[&str] = &["audio", "embed", "iframe", "object", "video"];

/// Elements whose content is never part of the document text
const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "template", "noscript", "title", "meta", "link", "input", "button",
];

/// Options for markdown serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Bullet list marker: `-`, `*` or `+`
    pub bullet: char,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions { bullet: '-' }
    }
}

/// Serialize an HTML document or fragment to extended markdown.
///
/// Empty input gives empty output; anything else is trimmed and ends with a
/// single newline.
pub fn serialize(html: &str, options: &SerializeOptions) -> Result<String, ConvertError> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }

    let dom = parse_html(html);
    let body = body(&dom)
        .ok_or_else(|| ConvertError::Serialize("HTML document has no body".to_string()))?;
    let children: Vec<Handle> = body.children.borrow().clone();

    let arena = Arena::new();
    let builder = AstBuilder {
        arena: &arena,
        options,
    };
    let markdown = builder.markdown_of(&children, Scope::default())?;

    let trimmed = markdown.trim();
    if trimmed.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("{trimmed}\n"))
    }
}

fn comrak_options(options: &SerializeOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = true;
    comrak.extension.strikethrough = true;
    comrak.extension.autolink = true;
    comrak.extension.tasklist = true;
    comrak.render.unsafe_ = true;
    comrak.render.list_style = match options.bullet {
        '*' => ListStyleType::Star,
        '+' => ListStyleType::Plus,
        _ => ListStyleType::Dash,
    };
    comrak
}

/// Where in the document a subtree is being converted
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    depth: usize,
    in_admonition: bool,
    in_table: bool,
}

impl Scope {
    fn deeper(self) -> Scope {
        Scope {
            depth: self.depth + 1,
            ..self
        }
    }
}

struct AstBuilder<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    options: &'o SerializeOptions,
}

impl<'a> AstBuilder<'a, '_> {
    fn node(&self, value: NodeValue) -> &'a AstNode<'a> {
        self.arena
            .alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
    }

    fn raw_block(&self, literal: String) -> &'a AstNode<'a> {
        self.node(NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 0,
            literal,
        }))
    }

    fn raw_inline(&self, literal: String) -> &'a AstNode<'a> {
        self.node(NodeValue::HtmlInline(literal))
    }

    /// Append document text. Comrak leaves `$` alone, so it is escaped here
    /// to keep literal dollars from reading back as math.
    fn text(&self, parent: &'a AstNode<'a>, text: &str) {
        for (i, piece) in text.split('$').enumerate() {
            if i > 0 {
                parent.append(self.raw_inline("\\$".to_string()));
            }
            if !piece.is_empty() {
                parent.append(self.node(NodeValue::Text(piece.to_string())));
            }
        }
    }

    /// Convert a run of sibling DOM nodes into a standalone markdown string.
    fn markdown_of(&self, children: &[Handle], scope: Scope) -> Result<String, ConvertError> {
        let root = self.node(NodeValue::Document);
        self.blocks(root, children, scope)?;

        let mut output = Vec::new();
        format_commonmark(root, &comrak_options(self.options), &mut output).map_err(|e| {
            ConvertError::Serialize(format!("Comrak serialization failed: {e}"))
        })?;
        let markdown = String::from_utf8(output)
            .map_err(|e| ConvertError::Serialize(format!("UTF-8 conversion failed: {e}")))?;

        // Comrak separates adjacent lists with a marker comment
        Ok(markdown.replace("<!-- end list -->\n\n", ""))
    }

    /// Append block nodes for `children` to `parent`. Loose inline content is
    /// gathered into paragraphs.
    fn blocks(
        &self,
        parent: &'a AstNode<'a>,
        children: &[Handle],
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let mut paragraph: Option<&'a AstNode<'a>> = None;
        for child in children {
            if is_block(child) {
                self.flush_paragraph(parent, paragraph.take());
                self.block(parent, child, scope)?;
            } else {
                let para = *paragraph.get_or_insert_with(|| self.node(NodeValue::Paragraph));
                self.inline(para, child, scope)?;
            }
        }
        self.flush_paragraph(parent, paragraph);
        Ok(())
    }

    fn flush_paragraph(&self, parent: &'a AstNode<'a>, paragraph: Option<&'a AstNode<'a>>) {
        if let Some(para) = paragraph {
            tidy_inline(para);
            self.escape_container_fences(para);
            if para.first_child().is_some() {
                parent.append(para);
            }
        }
    }

    /// A line of text starting with `:::` would open an admonition container.
    fn escape_container_fences(&self, para: &'a AstNode<'a>) {
        let mut current = para.first_child();
        while let Some(node) = current {
            current = node.next_sibling();
            let line_start = node.previous_sibling().map_or(true, |prev| {
                matches!(
                    prev.data.borrow().value,
                    NodeValue::LineBreak | NodeValue::SoftBreak
                )
            });
            if !line_start {
                continue;
            }
            let escaped = match node.data.borrow_mut().value {
                NodeValue::Text(ref mut text) if text.trim_start().starts_with(":::") => {
                    *text = text.trim_start()[1..].to_string();
                    true
                }
                _ => false,
            };
            if escaped {
                node.insert_before(self.raw_inline("\\:".to_string()));
            }
        }
    }

    fn block(
        &self,
        parent: &'a AstNode<'a>,
        handle: &Handle,
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let Some(name) = element_name(handle) else {
            return Ok(());
        };
        let children: Vec<Handle> = handle.children.borrow().clone();

        if scope.depth >= MAX_DEPTH {
            let text = collapse_whitespace(&text_content(handle));
            if !text.trim().is_empty() {
                let para = self.node(NodeValue::Paragraph);
                self.text(para, text.trim());
                parent.append(para);
            }
            return Ok(());
        }
        let inner = scope.deeper();

        if is_math_block(handle) {
            let content = math_content(handle, "$$");
            parent.append(self.raw_block(format!("$$\n{content}\n$$\n")));
            return Ok(());
        }
        if is_admonition(handle) && !scope.in_admonition {
            return self.admonition(parent, handle, inner);
        }
        if has_class(handle, "footnotes") {
            return self.footnotes(parent, handle, inner);
        }

        match name.as_str() {
            "p" => {
                let para = self.node(NodeValue::Paragraph);
                for child in &children {
                    self.inline(para, child, inner)?;
                }
                self.flush_paragraph(parent, Some(para));
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<u8>().unwrap_or(1);
                let heading = self.node(NodeValue::Heading(NodeHeading {
                    level,
                    setext: false,
                }));
                for child in &children {
                    self.inline(heading, child, inner)?;
                }
                tidy_inline(heading);
                if heading.first_child().is_some() {
                    parent.append(heading);
                }
            }
            "ul" | "ol" => self.list(parent, handle, name == "ol", inner)?,
            "blockquote" => {
                let quote = self.node(NodeValue::BlockQuote);
                self.blocks(quote, &children, inner)?;
                parent.append(quote);
            }
            "pre" => parent.append(self.code_block(handle)),
            "hr" => {
                if !has_class(handle, "footnotes-sep") {
                    parent.append(self.node(NodeValue::ThematicBreak));
                }
            }
            "table" => self.table(parent, handle, inner)?,
            "dl" => self.definition_list(parent, handle, inner)?,
            "head" => {}
            _ if MEDIA_ELEMENTS.contains(&name.as_str()) => {
                let mut literal = outer_html(handle)?;
                literal.push('\n');
                parent.append(self.raw_block(literal));
            }
            _ if DROPPED_ELEMENTS.contains(&name.as_str()) => {}
            // Layout wrappers and stray table parts
            _ => self.blocks(parent, &children, inner)?,
        }
        Ok(())
    }

    fn inline(
        &self,
        parent: &'a AstNode<'a>,
        handle: &Handle,
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let name = match handle.data {
            NodeData::Text { ref contents } => {
                let text = collapse_whitespace(&contents.borrow());
                self.text(parent, &text);
                return Ok(());
            }
            NodeData::Element { .. } => element_name(handle).unwrap_or_default(),
            _ => return Ok(()),
        };

        if scope.depth >= MAX_DEPTH {
            let text = collapse_whitespace(&text_content(handle));
            self.text(parent, &text);
            return Ok(());
        }
        let inner = scope.deeper();
        let children: Vec<Handle> = handle.children.borrow().clone();
        let wrap = |value: NodeValue| -> Result<(), ConvertError> {
            let node = self.node(value);
            for child in &children {
                self.inline(node, child, inner)?;
            }
            parent.append(node);
            Ok(())
        };

        if has_class(handle, "math-inline") || has_class(handle, "math-block") {
            let delimiter = if has_class(handle, "math-block") { "$$" } else { "$" };
            let content = math_content(handle, delimiter);
            if !content.is_empty() {
                parent.append(self.raw_inline(format!("${content}$")));
            }
            return Ok(());
        }
        if has_class(handle, "footnote-ref") {
            if let Some(label) = footnote_ref_label(handle) {
                parent.append(self.raw_inline(format!("[^{label}]")));
            }
            return Ok(());
        }
        if has_class(handle, "footnote-backref") {
            return Ok(());
        }

        match name.as_str() {
            "strong" | "b" => wrap(NodeValue::Strong)?,
            "em" | "i" => wrap(NodeValue::Emph)?,
            "s" | "del" | "strike" => wrap(NodeValue::Strikethrough)?,
            "code" | "kbd" | "samp" | "tt" => {
                let literal = text_content(handle).replace('\n', " ");
                if !literal.is_empty() {
                    parent.append(self.node(NodeValue::Code(NodeCode {
                        num_backticks: 1,
                        literal,
                    })));
                }
            }
            "a" => match attr(handle, "href") {
                Some(url) => wrap(NodeValue::Link(NodeLink {
                    url,
                    title: attr(handle, "title").unwrap_or_default(),
                }))?,
                None => {
                    for child in &children {
                        self.inline(parent, child, inner)?;
                    }
                }
            },
            "img" => {
                let image = self.node(NodeValue::Image(NodeLink {
                    url: attr(handle, "src").unwrap_or_default(),
                    title: attr(handle, "title").unwrap_or_default(),
                }));
                let alt = attr(handle, "alt").unwrap_or_default();
                if !alt.is_empty() {
                    image.append(self.node(NodeValue::Text(alt)));
                }
                parent.append(image);
            }
            "br" => {
                let value = if scope.in_table {
                    NodeValue::Text(" ".to_string())
                } else {
                    NodeValue::LineBreak
                };
                parent.append(self.node(value));
            }
            _ if MEDIA_ELEMENTS.contains(&name.as_str()) => {
                parent.append(self.raw_inline(outer_html(handle)?));
            }
            _ if DROPPED_ELEMENTS.contains(&name.as_str()) => {}
            _ => {
                // Unknown inline wrappers (span, u, mark, ...) and block
                // elements met in inline position contribute their content.
                let separate = is_block(handle) && parent.first_child().is_some();
                if separate {
                    parent.append(self.node(NodeValue::Text(" ".to_string())));
                }
                for child in &children {
                    self.inline(parent, child, inner)?;
                }
            }
        }
        Ok(())
    }

    fn list(
        &self,
        parent: &'a AstNode<'a>,
        handle: &Handle,
        ordered: bool,
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let items: Vec<Handle> = element_children(handle)
            .into_iter()
            .filter(|child| element_name(child).as_deref() == Some("li"))
            .collect();
        if items.is_empty() {
            return Ok(());
        }

        let tight = items.iter().all(|item| {
            !element_children(item)
                .iter()
                .any(|child| element_name(child).as_deref() == Some("p"))
        });
        let start = attr(handle, "start")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(1);
        let list_value = NodeList {
            list_type: if ordered {
                ListType::Ordered
            } else {
                ListType::Bullet
            },
            marker_offset: 0,
            padding: 0,
            start,
            delimiter: ListDelimType::Period,
            bullet_char: self.options.bullet as u8,
            tight,
        };

        let list = self.node(NodeValue::List(list_value));
        for item in &items {
            let item_node = self.node(NodeValue::Item(list_value));
            let children: Vec<Handle> = item.children.borrow().clone();
            self.blocks(item_node, &children, scope)?;
            if let Some(checked) = task_state(item) {
                self.mark_task(item_node, checked);
            }
            list.append(item_node);
        }
        parent.append(list);
        Ok(())
    }

    /// Put a `[ ]` / `[x]` marker at the start of a list item.
    fn mark_task(&self, item: &'a AstNode<'a>, checked: bool) {
        let marker = if checked { "[x]" } else { "[ ]" };
        let first_is_paragraph = item
            .first_child()
            .is_some_and(|child| matches!(child.data.borrow().value, NodeValue::Paragraph));
        if first_is_paragraph {
            if let Some(para) = item.first_child() {
                para.prepend(self.raw_inline(format!("{marker} ")));
            }
        } else {
            let para = self.node(NodeValue::Paragraph);
            para.append(self.raw_inline(marker.to_string()));
            item.prepend(para);
        }
    }

    fn code_block(&self, pre: &Handle) -> &'a AstNode<'a> {
        let code = element_children(pre)
            .into_iter()
            .find(|child| element_name(child).as_deref() == Some("code"));
        let info = code
            .as_ref()
            .and_then(code_language)
            .or_else(|| code_language(pre))
            .unwrap_or_default();
        let mut literal = text_content(pre);
        if !literal.ends_with('\n') {
            literal.push('\n');
        }
        self.node(NodeValue::CodeBlock(NodeCodeBlock {
            fenced: true,
            fence_char: b'`',
            fence_length: 3,
            fence_offset: 0,
            info,
            literal,
        }))
    }

    fn admonition(
        &self,
        parent: &'a AstNode<'a>,
        handle: &Handle,
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let config = attr(handle, CONFIG_ATTR)
            .map(|encoded| NodeConfig::decode(&encoded))
            .filter(|config| config.kind == "admonition");
        let kind = config
            .as_ref()
            .and_then(|config| AdmonitionKind::from_name(&config.variant))
            .or_else(|| {
                classes(handle).iter().find_map(|class| {
                    class
                        .strip_prefix("admonition-")
                        .and_then(AdmonitionKind::from_name)
                })
            })
            .unwrap_or(AdmonitionKind::Note);

        let children: Vec<Handle> = handle.children.borrow().clone();
        let title_element = children
            .iter()
            .find(|child| has_class(child, "admonition-title"))
            .cloned();
        let title = match (&config, &title_element) {
            (Some(config), _) => config.title.clone(),
            (None, Some(element)) => {
                let text = collapse_whitespace(&text_content(element)).trim().to_string();
                if text == kind.default_title() {
                    String::new()
                } else {
                    text
                }
            }
            (None, None) => String::new(),
        };
        let title = title.replace('\n', " ");

        let opener = if title.is_empty() {
            format!("::: {}\n", kind.name())
        } else {
            format!("::: {} {}\n", kind.name(), title.trim())
        };
        parent.append(self.raw_block(opener));

        let body: Vec<Handle> = children
            .into_iter()
            .filter(|child| !has_class(child, "admonition-title"))
            .collect();
        let inner = Scope {
            in_admonition: true,
            ..scope
        };
        self.blocks(parent, &body, inner)?;
        parent.append(self.raw_block(":::\n".to_string()));
        Ok(())
    }

    fn footnotes(
        &self,
        parent: &'a AstNode<'a>,
        handle: &Handle,
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let mut items = Vec::new();
        collect_elements(handle, "li", &mut items);
        for (index, item) in items.iter().enumerate() {
            let label = footnote_item_label(item).unwrap_or_else(|| (index + 1).to_string());
            let children: Vec<Handle> = item.children.borrow().clone();
            let body = self.markdown_of(&children, scope)?;
            let body = body.trim();
            if body.is_empty() {
                continue;
            }

            let mut literal = format!("[^{label}]:");
            for (line_no, line) in body.lines().enumerate() {
                if line_no == 0 {
                    literal.push(' ');
                    literal.push_str(line);
                } else if line.trim().is_empty() {
                    literal.push('\n');
                } else {
                    literal.push_str("\n    ");
                    literal.push_str(line);
                }
            }
            literal.push('\n');
            parent.append(self.raw_block(literal));
        }
        Ok(())
    }

    fn table(
        &self,
        parent: &'a AstNode<'a>,
        handle: &Handle,
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let mut rows: Vec<Vec<Handle>> = Vec::new();
        collect_rows(handle, &mut rows);
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Ok(());
        }

        let header = rows.remove(0);
        let body: Vec<Vec<Handle>> = rows
            .into_iter()
            .filter(|row| !row.iter().all(is_empty_cell))
            .collect();

        let alignments: Vec<TableAlignment> = (0..columns)
            .map(|column| {
                let alignment = header
                    .get(column)
                    .map(cell_alignment)
                    .filter(|alignment| *alignment != Alignment::None)
                    .or_else(|| body.first().and_then(|row| row.get(column)).map(cell_alignment))
                    .unwrap_or_default();
                match alignment {
                    Alignment::Left => TableAlignment::Left,
                    Alignment::Center => TableAlignment::Center,
                    Alignment::Right => TableAlignment::Right,
                    Alignment::None => TableAlignment::None,
                }
            })
            .collect();

        let table = self.node(NodeValue::Table(NodeTable {
            alignments,
            num_columns: columns,
            num_rows: body.len() + 1,
            num_nonempty_cells: 0,
        }));
        let cell_scope = Scope {
            in_table: true,
            ..scope
        };
        for (index, row) in std::iter::once(&header).chain(body.iter()).enumerate() {
            let row_node = self.node(NodeValue::TableRow(index == 0));
            for column in 0..columns {
                let cell_node = self.node(NodeValue::TableCell);
                if let Some(cell) = row.get(column) {
                    let children: Vec<Handle> = cell.children.borrow().clone();
                    for child in &children {
                        self.inline(cell_node, child, cell_scope)?;
                    }
                    tidy_inline(cell_node);
                }
                row_node.append(cell_node);
            }
            table.append(row_node);
        }
        parent.append(table);
        Ok(())
    }

    fn definition_list(
        &self,
        parent: &'a AstNode<'a>,
        handle: &Handle,
        scope: Scope,
    ) -> Result<(), ConvertError> {
        let mut entries = Vec::new();
        collect_definition_entries(handle, &mut entries);

        let mut group: Option<&'a AstNode<'a>> = None;
        for entry in &entries {
            let children: Vec<Handle> = entry.children.borrow().clone();
            if element_name(entry).as_deref() == Some("dt") {
                self.flush_paragraph(parent, group.take());
                let term = self.node(NodeValue::Paragraph);
                for child in &children {
                    self.inline(term, child, scope)?;
                }
                tidy_inline(term);
                group = Some(term);
            } else {
                let para = *group.get_or_insert_with(|| self.node(NodeValue::Paragraph));
                if para.first_child().is_some() {
                    para.append(self.node(NodeValue::SoftBreak));
                }
                para.append(self.raw_inline(": ".to_string()));
                let definition = self.node(NodeValue::Paragraph);
                for child in &children {
                    self.inline(definition, child, scope)?;
                }
                tidy_inline(definition);
                while let Some(child) = definition.first_child() {
                    child.detach();
                    para.append(child);
                }
            }
        }
        self.flush_paragraph(parent, group);
        Ok(())
    }
}

fn is_block(handle: &Handle) -> bool {
    match element_name(handle) {
        Some(name) => {
            BLOCK_ELEMENTS.contains(&name.as_str())
                || MEDIA_ELEMENTS.contains(&name.as_str())
                || is_math_block(handle)
        }
        None => false,
    }
}

fn node_config(handle: &Handle) -> Option<NodeConfig> {
    attr(handle, CONFIG_ATTR).map(|encoded| NodeConfig::decode(&encoded))
}

fn is_math_block(handle: &Handle) -> bool {
    has_class(handle, "math-block")
        || node_config(handle).is_some_and(|c| c.kind == "math" && c.variant == "block")
}

fn is_admonition(handle: &Handle) -> bool {
    has_class(handle, "admonition")
        || node_config(handle).is_some_and(|config| config.kind == "admonition")
}

/// Text of a math element with one surrounding delimiter pair removed
fn math_content(handle: &Handle, delimiter: &str) -> String {
    let text = text_content(handle);
    let trimmed = text.trim();
    let inner = if trimmed.len() >= 2 * delimiter.len() {
        trimmed
            .strip_prefix(delimiter)
            .and_then(|rest| rest.strip_suffix(delimiter))
            .unwrap_or(trimmed)
    } else {
        trimmed
    };
    inner.trim().to_string()
}

fn footnote_ref_label(handle: &Handle) -> Option<String> {
    if let Some(config) = node_config(handle).filter(|c| c.kind == "footnote") {
        if !config.variant.is_empty() {
            return Some(config.variant);
        }
    }
    let mut anchors = Vec::new();
    collect_elements(handle, "a", &mut anchors);
    let from_href = anchors
        .iter()
        .filter_map(|a| attr(a, "href"))
        .find_map(|href| href.strip_prefix("#fn").map(str::to_string))
        .filter(|label| !label.is_empty());
    from_href.or_else(|| {
        let text = text_content(handle);
        let label = text.trim().trim_start_matches('[').trim_end_matches(']').trim();
        (!label.is_empty() && !label.contains(char::is_whitespace)).then(|| label.to_string())
    })
}

fn footnote_item_label(handle: &Handle) -> Option<String> {
    if let Some(config) = node_config(handle).filter(|c| c.kind == "footnote") {
        if !config.variant.is_empty() {
            return Some(config.variant);
        }
    }
    attr(handle, "id")
        .and_then(|id| id.strip_prefix("fn").map(str::to_string))
        .filter(|label| !label.is_empty())
}

/// Checkbox state of a task list item, if it is one
fn task_state(item: &Handle) -> Option<bool> {
    let checkbox = find_checkbox(item, 0);
    if let Some(input) = &checkbox {
        return Some(has_attr(input, "checked"));
    }
    if let Some(value) = attr(item, "data-checked") {
        return Some(matches!(value.trim(), "true" | "checked" | "1"));
    }
    has_class(item, "task-list-item").then_some(false)
}

/// A checkbox among the first nodes of a list item (directly or in its first paragraph/label)
fn find_checkbox(handle: &Handle, depth: usize) -> Option<Handle> {
    for child in element_children(handle) {
        match element_name(&child).as_deref() {
            Some("input") => {
                let is_checkbox = attr(&child, "type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"));
                return is_checkbox.then_some(child);
            }
            Some("p") | Some("label") | Some("span") if depth == 0 => {
                return find_checkbox(&child, depth + 1);
            }
            _ => return None,
        }
    }
    None
}

fn code_language(handle: &Handle) -> Option<String> {
    classes(handle).into_iter().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}

fn collect_elements(handle: &Handle, name: &str, found: &mut Vec<Handle>) {
    for child in element_children(handle) {
        if element_name(&child).as_deref() == Some(name) {
            found.push(child);
        } else {
            collect_elements(&child, name, found);
        }
    }
}

/// Rows of a table in document order, each as its `th`/`td` cells
fn collect_rows(handle: &Handle, rows: &mut Vec<Vec<Handle>>) {
    for child in element_children(handle) {
        match element_name(&child).as_deref() {
            Some("tr") => rows.push(
                element_children(&child)
                    .into_iter()
                    .filter(|cell| matches!(element_name(cell).as_deref(), Some("th" | "td")))
                    .collect(),
            ),
            Some("thead" | "tbody" | "tfoot") => collect_rows(&child, rows),
            _ => {}
        }
    }
}

fn is_empty_cell(cell: &Handle) -> bool {
    let mut images = Vec::new();
    collect_elements(cell, "img", &mut images);
    text_content(cell).trim().is_empty() && images.is_empty()
}

fn cell_alignment(cell: &Handle) -> Alignment {
    let declared = attr(cell, "style")
        .and_then(|style| {
            style.split(';').find_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                property
                    .trim()
                    .eq_ignore_ascii_case("text-align")
                    .then(|| value.trim().to_ascii_lowercase())
            })
        })
        .or_else(|| attr(cell, "align").map(|value| value.trim().to_ascii_lowercase()));
    match declared.as_deref() {
        Some("left") | Some("start") => Alignment::Left,
        Some("center") => Alignment::Center,
        Some("right") | Some("end") => Alignment::Right,
        _ => Alignment::None,
    }
}

/// `dt`/`dd` children of a `dl`, looking through `div` groupings
fn collect_definition_entries(handle: &Handle, entries: &mut Vec<Handle>) {
    for child in element_children(handle) {
        match element_name(&child).as_deref() {
            Some("dt" | "dd") => entries.push(child),
            Some("div") => collect_definition_entries(&child, entries),
            _ => {}
        }
    }
}

/// HTML whitespace rules: any run of whitespace is one space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn is_break(node: Option<&AstNode<'_>>) -> bool {
    match node {
        None => true,
        Some(node) => matches!(
            node.data.borrow().value,
            NodeValue::LineBreak | NodeValue::SoftBreak
        ),
    }
}

/// Trim text at the edges of a block and around line breaks; drop empty text.
fn tidy_inline<'a>(container: &'a AstNode<'a>) {
    let mut current = container.first_child();
    while let Some(node) = current {
        current = node.next_sibling();
        let trim_start = is_break(node.previous_sibling());
        let trim_end = is_break(node.next_sibling());
        let now_empty = {
            let mut data = node.data.borrow_mut();
            match data.value {
                NodeValue::Text(ref mut text) => {
                    if trim_start {
                        *text = text.trim_start().to_string();
                    }
                    if trim_end {
                        *text = text.trim_end().to_string();
                    }
                    text.is_empty()
                }
                _ => false,
            }
        };
        if now_empty {
            node.detach();
        }
    }

    // A break at either edge has nothing to separate
    while let Some(last) = container.last_child() {
        if matches!(
            last.data.borrow().value,
            NodeValue::LineBreak | NodeValue::SoftBreak
        ) {
            last.detach();
        } else {
            break;
        }
    }
}
