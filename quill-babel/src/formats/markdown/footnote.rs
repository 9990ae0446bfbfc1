//! Footnote wiring
//!
//! Definitions are collected while block parsing; references are resolved
//! during the inline pass. Numbers follow the order of first reference, and
//! the referenced definitions are appended as one footnote block at the end
//! of the stream. Definitions nobody references are dropped.

use super::inline::parse_inline;
use crate::ir::{Token, TokenKind, TokenMeta};
use std::collections::HashMap;

/// A `[^label]: ...` definition with its block tokens (inline content not yet parsed)
#[derive(Debug, Clone)]
pub(crate) struct FootnoteDefinition {
    pub label: String,
    pub tokens: Vec<Token>,
}

/// Reference bookkeeping shared by every inline parse of one document.
#[derive(Debug, Default)]
pub(crate) struct FootnoteEnv {
    defined: Vec<String>,
    order: Vec<String>,
    reference_counts: HashMap<String, usize>,
}

impl FootnoteEnv {
    pub(crate) fn new(defined: impl IntoIterator<Item = String>) -> Self {
        FootnoteEnv {
            defined: defined.into_iter().collect(),
            ..Default::default()
        }
    }

    pub(crate) fn is_defined(&self, label: &str) -> bool {
        self.defined.iter().any(|known| known == label)
    }

    /// Record a reference, returning its footnote number and how many times
    /// the label was referenced before.
    pub(crate) fn reference(&mut self, label: &str) -> (usize, usize) {
        let number = match self.order.iter().position(|known| known == label) {
            Some(index) => index + 1,
            None => {
                self.order.push(label.to_string());
                self.order.len()
            }
        };
        let count = self.reference_counts.entry(label.to_string()).or_insert(0);
        let sub = *count;
        *count += 1;
        (number, sub)
    }
}

/// Run the inline pass over every `inline` token.
pub(crate) fn parse_inline_tokens(tokens: &mut [Token], env: &mut FootnoteEnv) {
    for token in tokens.iter_mut() {
        if token.kind == TokenKind::Inline {
            token.children = parse_inline(&token.content, env);
        }
    }
}

/// Resolve inline content and append the footnote block.
pub(crate) fn resolve(mut tokens: Vec<Token>, definitions: Vec<FootnoteDefinition>) -> Vec<Token> {
    let mut env = FootnoteEnv::new(definitions.iter().map(|def| def.label.clone()));
    let mut bodies: HashMap<String, Vec<Token>> = definitions
        .into_iter()
        .map(|def| (def.label, def.tokens))
        .collect();

    parse_inline_tokens(&mut tokens, &mut env);

    // Bodies may reference further footnotes, which extends `env.order`.
    let mut block = Vec::new();
    let mut done = 0;
    while done < env.order.len() {
        let label = env.order[done].clone();
        let number = done + 1;
        let mut body = bodies.remove(&label).unwrap_or_default();
        parse_inline_tokens(&mut body, &mut env);
        attach_backref(&mut body, &label, number);

        let meta = TokenMeta::Footnote {
            label: label.clone(),
            number,
            sub: 0,
        };
        block.push(Token::new(TokenKind::FootnoteOpen).with_meta(meta.clone()));
        block.extend(body);
        block.push(Token::new(TokenKind::FootnoteClose).with_meta(meta));
        done += 1;
    }

    if !block.is_empty() {
        tokens.push(Token::new(TokenKind::FootnoteBlockOpen));
        tokens.extend(block);
        tokens.push(Token::new(TokenKind::FootnoteBlockClose));
    }
    tokens
}

/// Put the back-reference at the end of the last paragraph, or in a new one.
fn attach_backref(body: &mut Vec<Token>, label: &str, number: usize) {
    let anchor = Token::new(TokenKind::FootnoteAnchor).with_meta(TokenMeta::Footnote {
        label: label.to_string(),
        number,
        sub: 0,
    });

    if body.last().map(|token| token.kind) == Some(TokenKind::ParagraphClose) {
        if let Some(inline) = body
            .iter_mut()
            .rev()
            .find(|token| token.kind == TokenKind::Inline)
        {
            inline.children.push(anchor);
            return;
        }
    }

    body.push(Token::new(TokenKind::ParagraphOpen));
    body.push(Token::new(TokenKind::Inline).with_children(vec![anchor]));
    body.push(Token::new(TokenKind::ParagraphClose));
}
