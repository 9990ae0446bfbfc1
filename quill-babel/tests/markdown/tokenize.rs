//! Tokenizer tests (Markdown → token stream)

use insta::assert_snapshot;
use quill_babel::common::tables::Alignment;
use quill_babel::formats::markdown::tokenize;
use quill_babel::ir::token::to_simple_listing;
use quill_babel::{AdmonitionKind, Token, TokenKind};

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

fn inline_kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Inline)
        .flat_map(|t| t.children.iter().map(|c| c.kind))
        .collect()
}

#[test]
fn test_admonition_listing() {
    let tokens = tokenize("::: tip\nUse it\n:::");
    assert_snapshot!(to_simple_listing(&tokens), @r###"
    container_open
      paragraph_open
        inline
          text "Use it"
      paragraph_close
    container_close
    "###);
    assert_eq!(tokens[0].info, "tip");
}

#[test]
fn test_admonition_kinds_are_case_insensitive() {
    for (source, kind) in [
        ("::: WARNING\nx\n:::", AdmonitionKind::Warning),
        (":::danger Careful\nx\n:::", AdmonitionKind::Danger),
        ("::: Caution\nx\n:::", AdmonitionKind::Caution),
    ] {
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::ContainerOpen, "{source}");
        assert_eq!(
            tokens[0].meta,
            Some(quill_babel::ir::TokenMeta::Admonition(kind)),
            "{source}"
        );
    }
}

#[test]
fn test_unknown_container_name_is_a_paragraph() {
    let tokens = tokenize("::: sidebar\nx\n:::");
    assert!(!kinds(&tokens).contains(&TokenKind::ContainerOpen));
}

#[test]
fn test_math_block_and_inline() {
    let tokens = tokenize("$$\n\\frac{a}{b}\n$$\n\nCost $x + y$ total");
    assert_eq!(tokens[0].kind, TokenKind::MathBlock);
    assert_eq!(tokens[0].content, "\\frac{a}{b}");
    assert_eq!(
        inline_kinds(&tokens),
        vec![TokenKind::Text, TokenKind::MathInline, TokenKind::Text]
    );
}

#[test]
fn test_escaped_and_spaced_dollars_stay_text() {
    let tokens = tokenize("Price \\$5 and $ 10");
    assert!(!inline_kinds(&tokens).contains(&TokenKind::MathInline));
}

#[test]
fn test_task_list_items() {
    let tokens = tokenize("- [ ] todo\n- [x] done\n- plain");
    let states: Vec<Option<bool>> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::ListItemOpen)
        .map(|t| t.task_state())
        .collect();
    assert_eq!(states, vec![Some(false), Some(true), None]);
}

#[test]
fn test_table_alignment() {
    let tokens = tokenize("| a | b | c |\n| :-- | :-: | --: |\n| 1 | 2 | 3 |");
    let aligns: Vec<Alignment> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::ThOpen)
        .map(|t| t.alignment())
        .collect();
    assert_eq!(
        aligns,
        vec![Alignment::Left, Alignment::Center, Alignment::Right]
    );
    let cells = tokens.iter().filter(|t| t.kind == TokenKind::TdOpen).count();
    assert_eq!(cells, 3);
}

#[test]
fn test_blank_separated_rows_are_not_a_table() {
    let tokens = tokenize("| a | b |\n\n| --- | --- |\n\n| 1 | 2 |");
    assert!(!kinds(&tokens).contains(&TokenKind::TableOpen));
}

#[test]
fn test_definition_list() {
    let tokens = tokenize("Term\n: First\n: Second");
    let structure: Vec<TokenKind> = kinds(&tokens)
        .into_iter()
        .filter(|k| *k != TokenKind::Inline)
        .collect();
    assert_eq!(structure[0], TokenKind::DlOpen);
    assert_eq!(
        structure.iter().filter(|k| **k == TokenKind::DdOpen).count(),
        2
    );
    assert_eq!(structure.last(), Some(&TokenKind::DlClose));
}

#[test]
fn test_footnote_block_is_appended() {
    let tokens = tokenize("Claim[^src].\n\n[^src]: The source.\n\nAfter.");
    let listing = to_simple_listing(&tokens);
    assert!(listing.contains("footnote_ref"));
    assert!(listing.trim_end().ends_with("footnote_block_close"));
    let refs: Vec<&Token> = tokens
        .iter()
        .flat_map(|t| t.children.iter())
        .filter(|t| t.kind == TokenKind::FootnoteRef)
        .collect();
    assert_eq!(refs.len(), 1);
}

#[test]
fn test_fenced_code_keeps_info_and_content() {
    let tokens = tokenize("```rust\nlet x = 1;\n```");
    assert_eq!(kinds(&tokens), vec![TokenKind::Fence]);
    assert_eq!(tokens[0].info, "rust");
    assert_eq!(tokens[0].content, "let x = 1;\n");
}

#[test]
fn test_raw_html_block() {
    let tokens = tokenize("<div class=\"x\">\nraw\n</div>\n\npara");
    assert_eq!(tokens[0].kind, TokenKind::HtmlBlock);
    assert_eq!(tokens[1].kind, TokenKind::ParagraphOpen);
}
