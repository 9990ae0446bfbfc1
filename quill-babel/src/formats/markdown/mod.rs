//! Markdown format implementation
//!
//! Reading markdown is done by our own tokenizer; writing markdown goes through
//! `comrak`'s CommonMark formatter.
//!
//! # Why a Hand-Written Tokenizer
//!
//! The dialect has constructs no CommonMark parser knows about (math,
//! admonition containers, definition lists) and the renderer needs a flat,
//! inspectable token stream rather than an AST. The tokenizer is therefore a
//! small rule-table parser:
//! - [`block`]: line-based block rules in a fixed priority order
//! - [`inline`]: character-level inline rules in a fixed priority order
//! - [`footnote`]: definition collection, reference numbering, footnote block
//!
//! Writing markdown has none of these concerns, so [`serializer`] builds a
//! comrak AST from an HTML tree and lets comrak print it.
//!
//! # Construct Mapping Table
//!
//! | Markdown                  | Token kinds                          | HTML (rendered)                                  |
//! |---------------------------|--------------------------------------|--------------------------------------------------|
//! | `$$ ... $$`               | math_block                           | `<div class="math-block">`                       |
//! | `$x$`                     | math_inline                          | `<span class="math-inline">`                     |
//! | `::: tip Title` ... `:::` | container_open / container_close     | `<div class="admonition admonition-tip">`        |
//! | `- [x] item`              | list_item_open (task meta)           | `<li class="task-list-item">` + checkbox          |
//! | `Term` / `: definition`   | dl / dt / dd                         | `<dl><dt><dd>`                                   |
//! | `[^a]` / `[^a]: note`     | footnote_ref, footnote_block ...     | `<sup class="footnote-ref">`, `<section class="footnotes">` |
//! | pipe table                | table / thead / tbody / tr / th / td | `<div class="table-wrapper"><table>`             |
//! | fenced code               | fence                                | `<pre><code class="language-x">`                 |
//!
//! # Lossy Conversions
//!
//! - Setext headings come back as ATX headings
//! - `_emphasis_` comes back as `*emphasis*`
//! - Footnote labels survive, but definitions move to the end of the document
//! - Indented code comes back fenced

pub mod block;
pub mod footnote;
pub mod inline;
pub mod serializer;

use crate::ir::Token;

/// Tokenize extended markdown into a flat token stream.
///
/// Never fails: anything the grammar does not recognize ends up as literal
/// text. Table normalization is not applied here.
pub fn tokenize(source: &str) -> Vec<Token> {
    let (blocks, definitions) = block::parse_blocks(source);
    tracing::debug!(
        blocks = blocks.len(),
        footnotes = definitions.len(),
        "tokenized block structure"
    );
    footnote::resolve(blocks, definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::token::to_simple_listing;
    use crate::ir::TokenKind;

    #[test]
    fn tokenize_fills_inline_children() {
        let tokens = tokenize("Some *text*");
        assert_eq!(
            to_simple_listing(&tokens),
            "paragraph_open\n  inline\n    text \"Some \"\n    em_open\n      text \"text\"\n    em_close\nparagraph_close\n"
        );
    }

    #[test]
    fn footnotes_are_numbered_and_appended() {
        let tokens = tokenize("A[^x] and B[^y].\n\n[^y]: Why\n[^x]: Ex\n[^z]: unused\n");
        let block: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::FootnoteOpen)
            .map(|t| t.meta.clone())
            .collect();
        assert_eq!(block.len(), 2);
        assert_eq!(
            block[0],
            Some(crate::ir::TokenMeta::Footnote {
                label: "x".into(),
                number: 1,
                sub: 0
            })
        );
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::FootnoteBlockClose));
    }

    #[test]
    fn undefined_footnote_references_stay_literal() {
        let tokens = tokenize("See [^missing].");
        assert_eq!(tokens[1].children.len(), 1);
        assert_eq!(tokens[1].children[0].content, "See [^missing].");
    }
}
