//! Token definitions

use crate::common::admonition::AdmonitionKind;
use crate::common::tables::Alignment;
use serde::Serialize;
use std::fmt::Write as _;

/// Every token kind the tokenizer can emit.
///
/// Container-like constructs come as explicit `*Open`/`*Close` pairs. Leaf
/// blocks (`Fence`, `MathBlock`, ...) and most inline kinds are self-closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Block level
    ParagraphOpen,
    ParagraphClose,
    HeadingOpen,
    HeadingClose,
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    Fence,
    CodeBlock,
    Hr,
    HtmlBlock,
    MathBlock,
    ContainerOpen,
    ContainerClose,
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TbodyOpen,
    TbodyClose,
    TrOpen,
    TrClose,
    ThOpen,
    ThClose,
    TdOpen,
    TdClose,
    DlOpen,
    DlClose,
    DtOpen,
    DtClose,
    DdOpen,
    DdClose,
    FootnoteBlockOpen,
    FootnoteBlockClose,
    FootnoteOpen,
    FootnoteClose,
    Inline,

    // Inline level
    Text,
    Softbreak,
    Hardbreak,
    CodeInline,
    MathInline,
    EmOpen,
    EmClose,
    StrongOpen,
    StrongClose,
    StrikethroughOpen,
    StrikethroughClose,
    LinkOpen,
    LinkClose,
    Image,
    HtmlInline,
    FootnoteRef,
    FootnoteAnchor,
}

/// Whether a token opens a nesting level, closes one, or stands alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
    Leaf,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            ParagraphOpen => "paragraph_open",
            ParagraphClose => "paragraph_close",
            HeadingOpen => "heading_open",
            HeadingClose => "heading_close",
            BlockquoteOpen => "blockquote_open",
            BlockquoteClose => "blockquote_close",
            BulletListOpen => "bullet_list_open",
            BulletListClose => "bullet_list_close",
            OrderedListOpen => "ordered_list_open",
            OrderedListClose => "ordered_list_close",
            ListItemOpen => "list_item_open",
            ListItemClose => "list_item_close",
            Fence => "fence",
            CodeBlock => "code_block",
            Hr => "hr",
            HtmlBlock => "html_block",
            MathBlock => "math_block",
            ContainerOpen => "container_open",
            ContainerClose => "container_close",
            TableOpen => "table_open",
            TableClose => "table_close",
            TheadOpen => "thead_open",
            TheadClose => "thead_close",
            TbodyOpen => "tbody_open",
            TbodyClose => "tbody_close",
            TrOpen => "tr_open",
            TrClose => "tr_close",
            ThOpen => "th_open",
            ThClose => "th_close",
            TdOpen => "td_open",
            TdClose => "td_close",
            DlOpen => "dl_open",
            DlClose => "dl_close",
            DtOpen => "dt_open",
            DtClose => "dt_close",
            DdOpen => "dd_open",
            DdClose => "dd_close",
            FootnoteBlockOpen => "footnote_block_open",
            FootnoteBlockClose => "footnote_block_close",
            FootnoteOpen => "footnote_open",
            FootnoteClose => "footnote_close",
            Inline => "inline",
            Text => "text",
            Softbreak => "softbreak",
            Hardbreak => "hardbreak",
            CodeInline => "code_inline",
            MathInline => "math_inline",
            EmOpen => "em_open",
            EmClose => "em_close",
            StrongOpen => "strong_open",
            StrongClose => "strong_close",
            StrikethroughOpen => "s_open",
            StrikethroughClose => "s_close",
            LinkOpen => "link_open",
            LinkClose => "link_close",
            Image => "image",
            HtmlInline => "html_inline",
            FootnoteRef => "footnote_ref",
            FootnoteAnchor => "footnote_anchor",
        }
    }

    /// The close kind matching an open kind, `None` for anything else
    pub fn closer(self) -> Option<TokenKind> {
        use TokenKind::*;
        let close = match self {
            ParagraphOpen => ParagraphClose,
            HeadingOpen => HeadingClose,
            BlockquoteOpen => BlockquoteClose,
            BulletListOpen => BulletListClose,
            OrderedListOpen => OrderedListClose,
            ListItemOpen => ListItemClose,
            ContainerOpen => ContainerClose,
            TableOpen => TableClose,
            TheadOpen => TheadClose,
            TbodyOpen => TbodyClose,
            TrOpen => TrClose,
            ThOpen => ThClose,
            TdOpen => TdClose,
            DlOpen => DlClose,
            DtOpen => DtClose,
            DdOpen => DdClose,
            FootnoteBlockOpen => FootnoteBlockClose,
            FootnoteOpen => FootnoteClose,
            EmOpen => EmClose,
            StrongOpen => StrongClose,
            StrikethroughOpen => StrikethroughClose,
            LinkOpen => LinkClose,
            _ => return None,
        };
        Some(close)
    }

    pub fn nesting(self) -> Nesting {
        use TokenKind::*;
        if self.closer().is_some() {
            return Nesting::Open;
        }
        match self {
            ParagraphClose | HeadingClose | BlockquoteClose | BulletListClose
            | OrderedListClose | ListItemClose | ContainerClose | TableClose | TheadClose
            | TbodyClose | TrClose | ThClose | TdClose | DlClose | DtClose | DdClose
            | FootnoteBlockClose | FootnoteClose | EmClose | StrongClose | StrikethroughClose
            | LinkClose => Nesting::Close,
            _ => Nesting::Leaf,
        }
    }

    /// Inline kinds only appear in the children of an `inline` token
    pub fn is_inline(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Text | Softbreak
                | Hardbreak
                | CodeInline
                | MathInline
                | EmOpen
                | EmClose
                | StrongOpen
                | StrongClose
                | StrikethroughOpen
                | StrikethroughClose
                | LinkOpen
                | LinkClose
                | Image
                | HtmlInline
                | FootnoteRef
                | FootnoteAnchor
        )
    }
}

/// Typed per-kind metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenMeta {
    Heading { level: u8 },
    /// A list item that is a task item
    Task { checked: bool },
    Admonition(AdmonitionKind),
    Align(Alignment),
    OrderedStart(u32),
    /// `sub` counts repeated references to the same footnote, starting at 0
    Footnote {
        label: String,
        number: usize,
        sub: usize,
    },
}

/// One record of the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub markup: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Token>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TokenMeta>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Token {
            kind,
            content: String::new(),
            markup: String::new(),
            info: String::new(),
            attrs: Vec::new(),
            map: None,
            children: Vec::new(),
            hidden: false,
            meta: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Token::new(TokenKind::Text).with_content(content)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn with_map(mut self, start: usize, end: usize) -> Self {
        self.map = Some((start, end));
        self
    }

    pub fn with_meta(mut self, meta: TokenMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Value of the first attribute named `name`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn heading_level(&self) -> u8 {
        match self.meta {
            Some(TokenMeta::Heading { level }) => level,
            _ => 1,
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self.meta {
            Some(TokenMeta::Align(alignment)) => alignment,
            _ => Alignment::None,
        }
    }

    /// Checkbox state for task list items
    pub fn task_state(&self) -> Option<bool> {
        match self.meta {
            Some(TokenMeta::Task { checked }) => Some(checked),
            _ => None,
        }
    }
}

/// One line per token, indented by nesting depth. Inline children are listed
/// under their parent.
pub fn to_simple_listing(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    write_listing(tokens, &mut depth, &mut out);
    out
}

fn write_listing(tokens: &[Token], depth: &mut usize, out: &mut String) {
    for token in tokens {
        if token.kind.nesting() == Nesting::Close {
            *depth = depth.saturating_sub(1);
        }
        let _ = write!(out, "{}{}", "  ".repeat(*depth), token.kind.name());
        if !token.content.is_empty() && token.children.is_empty() {
            let _ = write!(out, " {:?}", token.content);
        }
        out.push('\n');
        if token.kind.nesting() == Nesting::Open {
            *depth += 1;
        }
        if !token.children.is_empty() {
            *depth += 1;
            write_listing(&token.children, depth, out);
            *depth -= 1;
        }
    }
}
