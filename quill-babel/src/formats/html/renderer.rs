//! HTML rendering (tokens → HTML)
//!
//! Walks the flat token stream and writes HTML text directly. Raw HTML blocks
//! and inline HTML pass through untouched, which is why this does not build a
//! DOM first.
//!
//! The walk keeps a stack of open tokens and refuses streams that do not
//! nest: a close without an open, a close of the wrong kind, an open never
//! closed, or an inline kind outside an `inline` token. The tokenizer never
//! produces such streams, but token streams are public data.

use crate::common::admonition::AdmonitionKind;
use crate::common::codec::{NodeConfig, CONFIG_ATTR};
use crate::error::ConvertError;
use crate::ir::{Nesting, Token, TokenKind, TokenMeta};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Options for HTML rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Run the table normalizer before tokenizing
    pub normalize_tables: bool,
    /// Class of the `<div>` wrapped around tables; empty disables the wrapper
    pub table_wrapper_class: String,
    /// Prefix for the language class on fenced code
    pub code_class_prefix: String,
    /// Titles used for admonitions written without one
    pub admonition_titles: BTreeMap<AdmonitionKind, String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            normalize_tables: true,
            table_wrapper_class: "table-wrapper".to_string(),
            code_class_prefix: "language-".to_string(),
            admonition_titles: BTreeMap::new(),
        }
    }
}

impl RenderOptions {
    pub fn with_admonition_title(mut self, kind: AdmonitionKind, title: &str) -> Self {
        self.admonition_titles.insert(kind, title.to_string());
        self
    }

    /// Title shown for an admonition of `kind` written without an explicit title
    pub fn admonition_title(&self, kind: AdmonitionKind) -> &str {
        self.admonition_titles
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_title())
    }
}

/// Render a token stream to an HTML fragment.
pub fn render(tokens: &[Token], options: &RenderOptions) -> Result<String, ConvertError> {
    let mut renderer = HtmlRenderer {
        out: String::new(),
        stack: Vec::new(),
        options,
    };
    for (index, token) in tokens.iter().enumerate() {
        renderer.block(token, tokens.get(index + 1))?;
    }
    if let Some(open) = renderer.stack.last() {
        return Err(ConvertError::Render(format!("unclosed {}", open.name())));
    }
    Ok(renderer.out)
}

struct HtmlRenderer<'o> {
    out: String,
    stack: Vec<TokenKind>,
    options: &'o RenderOptions,
}

/// Push opens and pop closes, failing on anything that does not nest.
fn track(stack: &mut Vec<TokenKind>, kind: TokenKind) -> Result<(), ConvertError> {
    match kind.nesting() {
        Nesting::Open => stack.push(kind),
        Nesting::Close => {
            let open = stack
                .pop()
                .ok_or_else(|| ConvertError::Render(format!("unbalanced {}", kind.name())))?;
            if open.closer() != Some(kind) {
                return Err(ConvertError::Render(format!(
                    "{} closes {}",
                    kind.name(),
                    open.name()
                )));
            }
        }
        Nesting::Leaf => {}
    }
    Ok(())
}

impl HtmlRenderer<'_> {
    fn block(&mut self, token: &Token, next: Option<&Token>) -> Result<(), ConvertError> {
        if token.kind.is_inline() {
            return Err(ConvertError::Render(format!(
                "inline token {} at block level",
                token.kind.name()
            )));
        }
        track(&mut self.stack, token.kind)?;

        let out = &mut self.out;
        match token.kind {
            TokenKind::ParagraphOpen => {
                if !token.hidden {
                    out.push_str("<p>");
                }
            }
            TokenKind::ParagraphClose => {
                if !token.hidden {
                    out.push_str("</p>\n");
                } else if next.is_some_and(|t| t.kind.nesting() != Nesting::Close) {
                    out.push('\n');
                }
            }
            TokenKind::HeadingOpen => {
                let _ = write!(out, "<h{}>", token.heading_level().clamp(1, 6));
            }
            TokenKind::HeadingClose => {
                let _ = writeln!(out, "</h{}>", token.heading_level().clamp(1, 6));
            }
            TokenKind::BlockquoteOpen => out.push_str("<blockquote>\n"),
            TokenKind::BlockquoteClose => out.push_str("</blockquote>\n"),
            TokenKind::BulletListOpen => out.push_str("<ul>\n"),
            TokenKind::BulletListClose => out.push_str("</ul>\n"),
            TokenKind::OrderedListOpen => match token.meta {
                Some(TokenMeta::OrderedStart(start)) if start != 1 => {
                    let _ = writeln!(out, "<ol start=\"{start}\">");
                }
                _ => out.push_str("<ol>\n"),
            },
            TokenKind::OrderedListClose => out.push_str("</ol>\n"),
            TokenKind::ListItemOpen => {
                match token.task_state() {
                    Some(checked) => {
                        out.push_str("<li class=\"task-list-item\">");
                        out.push_str("<input class=\"task-list-item-checkbox\" type=\"checkbox\" disabled");
                        if checked {
                            out.push_str(" checked");
                        }
                        out.push_str("> ");
                    }
                    None => out.push_str("<li>"),
                }
                if !starts_hidden_paragraph(next) {
                    out.push('\n');
                }
            }
            TokenKind::ListItemClose => out.push_str("</li>\n"),
            TokenKind::Fence => {
                let lang = token.info.split_whitespace().next().unwrap_or("");
                if lang.is_empty() {
                    out.push_str("<pre><code>");
                } else {
                    let class = format!("{}{}", self.options.code_class_prefix, lang);
                    let _ = write!(out, "<pre><code class=\"{}\">", html_escape(&class));
                }
                let _ = writeln!(out, "{}</code></pre>", html_escape(&token.content));
            }
            TokenKind::CodeBlock => {
                let _ = writeln!(out, "<pre><code>{}</code></pre>", html_escape(&token.content));
            }
            TokenKind::Hr => out.push_str("<hr>\n"),
            TokenKind::HtmlBlock => out.push_str(&token.content),
            TokenKind::MathBlock => {
                let config = NodeConfig::new("math", "block");
                let _ = writeln!(
                    out,
                    "<div class=\"math-block\" {CONFIG_ATTR}=\"{}\">{}</div>",
                    html_escape(&config.encode()),
                    html_escape(&format!("$$\n{}\n$$", token.content))
                );
            }
            TokenKind::ContainerOpen => {
                let kind = admonition_kind(token)?;
                let title = if token.content.is_empty() {
                    self.options.admonition_title(kind)
                } else {
                    token.content.as_str()
                };
                let config = NodeConfig::new("admonition", kind.name()).with_title(&token.content);
                let _ = write!(
                    out,
                    "<div class=\"admonition {}\" {CONFIG_ATTR}=\"{}\">\n<p class=\"admonition-title\">{}</p>\n",
                    kind.css_class(),
                    html_escape(&config.encode()),
                    html_escape(title)
                );
            }
            TokenKind::ContainerClose => out.push_str("</div>\n"),
            TokenKind::TableOpen => {
                let wrapper = &self.options.table_wrapper_class;
                if !wrapper.is_empty() {
                    let _ = writeln!(out, "<div class=\"{}\">", html_escape(wrapper));
                }
                out.push_str("<table>\n");
            }
            TokenKind::TableClose => {
                out.push_str("</table>\n");
                if !self.options.table_wrapper_class.is_empty() {
                    out.push_str("</div>\n");
                }
            }
            TokenKind::TheadOpen => out.push_str("<thead>\n"),
            TokenKind::TheadClose => out.push_str("</thead>\n"),
            TokenKind::TbodyOpen => out.push_str("<tbody>\n"),
            TokenKind::TbodyClose => out.push_str("</tbody>\n"),
            TokenKind::TrOpen => out.push_str("<tr>\n"),
            TokenKind::TrClose => out.push_str("</tr>\n"),
            TokenKind::ThOpen | TokenKind::TdOpen => {
                let tag = if token.kind == TokenKind::ThOpen { "th" } else { "td" };
                match token.alignment().css() {
                    Some(align) => {
                        let _ = write!(out, "<{tag} style=\"text-align: {align}\">");
                    }
                    None => {
                        let _ = write!(out, "<{tag}>");
                    }
                }
            }
            TokenKind::ThClose => out.push_str("</th>\n"),
            TokenKind::TdClose => out.push_str("</td>\n"),
            TokenKind::DlOpen => out.push_str("<dl>\n"),
            TokenKind::DlClose => out.push_str("</dl>\n"),
            TokenKind::DtOpen => out.push_str("<dt>"),
            TokenKind::DtClose => out.push_str("</dt>\n"),
            TokenKind::DdOpen => {
                out.push_str("<dd>");
                if !starts_hidden_paragraph(next) {
                    out.push('\n');
                }
            }
            TokenKind::DdClose => out.push_str("</dd>\n"),
            TokenKind::FootnoteBlockOpen => out.push_str(
                "<hr class=\"footnotes-sep\">\n<section class=\"footnotes\">\n<ol class=\"footnotes-list\">\n",
            ),
            TokenKind::FootnoteBlockClose => out.push_str("</ol>\n</section>\n"),
            TokenKind::FootnoteOpen => {
                let (label, number, _) = footnote_meta(token)?;
                let config = NodeConfig::new("footnote", label);
                let _ = write!(
                    out,
                    "<li id=\"fn{number}\" class=\"footnote-item\" {CONFIG_ATTR}=\"{}\">",
                    html_escape(&config.encode())
                );
            }
            TokenKind::FootnoteClose => out.push_str("</li>\n"),
            TokenKind::Inline => {
                render_inline(&token.children, out)?;
            }
            other => {
                return Err(ConvertError::Render(format!(
                    "unexpected {} token",
                    other.name()
                )))
            }
        }
        Ok(())
    }
}

fn starts_hidden_paragraph(next: Option<&Token>) -> bool {
    next.is_some_and(|t| t.kind == TokenKind::ParagraphOpen && t.hidden)
}

fn admonition_kind(token: &Token) -> Result<AdmonitionKind, ConvertError> {
    match token.meta {
        Some(TokenMeta::Admonition(kind)) => Ok(kind),
        _ => AdmonitionKind::from_name(&token.info).ok_or_else(|| {
            ConvertError::Render(format!("unknown admonition type '{}'", token.info))
        }),
    }
}

fn footnote_meta(token: &Token) -> Result<(&str, usize, usize), ConvertError> {
    match token.meta {
        Some(TokenMeta::Footnote {
            ref label,
            number,
            sub,
        }) => Ok((label, number, sub)),
        _ => Err(ConvertError::Render(format!(
            "{} without footnote metadata",
            token.kind.name()
        ))),
    }
}

/// Render the children of an `inline` token.
fn render_inline(children: &[Token], out: &mut String) -> Result<(), ConvertError> {
    let mut stack = Vec::new();
    for token in children {
        if !token.kind.is_inline() {
            return Err(ConvertError::Render(format!(
                "block token {} inside inline content",
                token.kind.name()
            )));
        }
        track(&mut stack, token.kind)?;

        match token.kind {
            TokenKind::Text => out.push_str(&html_escape(&token.content)),
            TokenKind::Softbreak => out.push('\n'),
            TokenKind::Hardbreak => out.push_str("<br>\n"),
            TokenKind::CodeInline => {
                let _ = write!(out, "<code>{}</code>", html_escape(&token.content));
            }
            TokenKind::MathInline => {
                let config = NodeConfig::new("math", "inline");
                let _ = write!(
                    out,
                    "<span class=\"math-inline\" {CONFIG_ATTR}=\"{}\">{}</span>",
                    html_escape(&config.encode()),
                    html_escape(&format!("${}$", token.content))
                );
            }
            TokenKind::EmOpen => out.push_str("<em>"),
            TokenKind::EmClose => out.push_str("</em>"),
            TokenKind::StrongOpen => out.push_str("<strong>"),
            TokenKind::StrongClose => out.push_str("</strong>"),
            TokenKind::StrikethroughOpen => out.push_str("<s>"),
            TokenKind::StrikethroughClose => out.push_str("</s>"),
            TokenKind::LinkOpen => {
                let _ = write!(out, "<a href=\"{}\"", html_escape(token.attr("href").unwrap_or("")));
                if let Some(title) = token.attr("title") {
                    let _ = write!(out, " title=\"{}\"", html_escape(title));
                }
                out.push('>');
            }
            TokenKind::LinkClose => out.push_str("</a>"),
            TokenKind::Image => {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"{}\"",
                    html_escape(token.attr("src").unwrap_or("")),
                    html_escape(token.attr("alt").unwrap_or(&token.content))
                );
                if let Some(title) = token.attr("title") {
                    let _ = write!(out, " title=\"{}\"", html_escape(title));
                }
                out.push('>');
            }
            TokenKind::HtmlInline => out.push_str(&token.content),
            TokenKind::FootnoteRef => {
                let (label, number, sub) = footnote_meta(token)?;
                let config = NodeConfig::new("footnote", label);
                let id = if sub > 0 {
                    format!("fnref{number}:{sub}")
                } else {
                    format!("fnref{number}")
                };
                let _ = write!(
                    out,
                    "<sup class=\"footnote-ref\" {CONFIG_ATTR}=\"{}\"><a href=\"#fn{number}\" id=\"{id}\">[{number}]</a></sup>",
                    html_escape(&config.encode())
                );
            }
            TokenKind::FootnoteAnchor => {
                let (_, number, _) = footnote_meta(token)?;
                let _ = write!(
                    out,
                    " <a href=\"#fnref{number}\" class=\"footnote-backref\">\u{21a9}\u{fe0e}</a>"
                );
            }
            other => {
                return Err(ConvertError::Render(format!(
                    "unexpected {} token",
                    other.name()
                )))
            }
        }
    }
    match stack.last() {
        Some(open) => Err(ConvertError::Render(format!("unclosed {}", open.name()))),
        None => Ok(()),
    }
}

/// Escape HTML special characters in text and attribute values
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::markdown::tokenize;

    fn html(source: &str) -> String {
        render(&tokenize(source), &RenderOptions::default()).unwrap()
    }

    #[test]
    fn paragraphs_and_inline_markup() {
        assert_eq!(
            html("Hello *world* and ~~gone~~"),
            "<p>Hello <em>world</em> and <s>gone</s></p>\n"
        );
    }

    #[test]
    fn math_is_escaped_and_tagged() {
        assert_eq!(
            html("$$\na < b\n$$"),
            "<div class=\"math-block\" data-config=\"kind=math&amp;variant=block\">$$\na &lt; b\n$$</div>\n"
        );
        assert_eq!(
            html("Euler: $e^{i\\pi}$"),
            "<p>Euler: <span class=\"math-inline\" data-config=\"kind=math&amp;variant=inline\">$e^{i\\pi}$</span></p>\n"
        );
    }

    #[test]
    fn admonition_titles_fall_back_to_defaults() {
        let out = html("::: warning\nCareful\n:::");
        assert!(out.starts_with(
            "<div class=\"admonition admonition-warning\" data-config=\"kind=admonition&amp;variant=warning\">\n<p class=\"admonition-title\">Warning</p>\n"
        ));
        assert!(out.ends_with("<p>Careful</p>\n</div>\n"));

        let options = RenderOptions::default().with_admonition_title(AdmonitionKind::Warning, "Achtung");
        let out = render(&tokenize("::: warning\nx\n:::"), &options).unwrap();
        assert!(out.contains("<p class=\"admonition-title\">Achtung</p>"));
    }

    #[test]
    fn explicit_admonition_title_is_escaped() {
        let out = html("::: tip Use <b> wisely\nx\n:::");
        assert!(out.contains("<p class=\"admonition-title\">Use &lt;b&gt; wisely</p>"));
    }

    #[test]
    fn tables_are_wrapped_and_aligned() {
        let out = html("| a | b |\n|:-:|---|\n| 1 | 2 |");
        assert_eq!(
            out,
            "<div class=\"table-wrapper\">\n<table>\n<thead>\n<tr>\n<th style=\"text-align: center\">a</th>\n<th>b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td style=\"text-align: center\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n</div>\n"
        );

        let options = RenderOptions {
            table_wrapper_class: String::new(),
            ..Default::default()
        };
        let out = render(&tokenize("| a |\n|---|"), &options).unwrap();
        assert!(out.starts_with("<table>"));
    }

    #[test]
    fn code_blocks() {
        assert_eq!(
            html("```rust\nlet x = 1 < 2;\n```"),
            "<pre><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>\n"
        );
        assert_eq!(html("    plain"), "<pre><code>plain\n</code></pre>\n");
    }

    #[test]
    fn task_lists_render_checkboxes() {
        assert_eq!(
            html("- [x] done\n- [ ] todo"),
            "<ul>\n<li class=\"task-list-item\"><input class=\"task-list-item-checkbox\" type=\"checkbox\" disabled checked> done</li>\n<li class=\"task-list-item\"><input class=\"task-list-item-checkbox\" type=\"checkbox\" disabled> todo</li>\n</ul>\n"
        );
    }

    #[test]
    fn footnotes_render_refs_and_section() {
        let out = html("Text[^n].\n\n[^n]: Note.");
        assert!(out.contains(
            "<sup class=\"footnote-ref\" data-config=\"kind=footnote&amp;variant=n\"><a href=\"#fn1\" id=\"fnref1\">[1]</a></sup>"
        ));
        assert!(out.contains("<section class=\"footnotes\">"));
        assert!(out.contains(
            "<p>Note. <a href=\"#fnref1\" class=\"footnote-backref\">\u{21a9}\u{fe0e}</a></p>"
        ));
    }

    #[test]
    fn definition_lists() {
        assert_eq!(
            html("Term\n: Meaning"),
            "<dl>\n<dt>Term</dt>\n<dd>Meaning</dd>\n</dl>\n"
        );
    }

    #[test]
    fn unbalanced_streams_are_errors() {
        let options = RenderOptions::default();
        let stray_close = vec![Token::new(TokenKind::ContainerClose)];
        assert!(matches!(
            render(&stray_close, &options),
            Err(ConvertError::Render(_))
        ));

        let unclosed = vec![Token::new(TokenKind::BlockquoteOpen)];
        assert!(render(&unclosed, &options).is_err());

        let mismatched = vec![
            Token::new(TokenKind::BlockquoteOpen),
            Token::new(TokenKind::ListItemClose),
        ];
        assert!(render(&mismatched, &options).is_err());

        let inline_at_block_level = vec![Token::text("loose")];
        assert!(render(&inline_at_block_level, &options).is_err());
    }

    #[test]
    fn links_and_images_escape_attributes() {
        assert_eq!(
            html("[a](https://x.test/?a=1&b=\"2\" \"T\") ![i](/p.png)"),
            "<p><a href=\"https://x.test/?a=1&amp;b=&quot;2&quot;\" title=\"T\">a</a> <img src=\"/p.png\" alt=\"i\"></p>\n"
        );
    }
}
