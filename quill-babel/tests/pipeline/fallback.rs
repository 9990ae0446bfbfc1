//! Failures degrade to returning the input

use quill_babel::ir::{Token, TokenKind};
use quill_babel::{html_to_markdown, markdown_to_html, ConvertError, Pipeline};

#[test]
fn test_unbalanced_stream_is_rejected_then_echoed() {
    let tokens = vec![
        Token::new(TokenKind::ParagraphOpen),
        Token::new(TokenKind::BlockquoteClose),
    ];
    let pipeline = Pipeline::default();
    let err = quill_babel::formats::html::render(&tokens, &pipeline.options().render).unwrap_err();
    assert!(matches!(err, ConvertError::Render(_)));
    assert_eq!(pipeline.render_or_echo("source text", &tokens), "source text");
}

#[test]
fn test_inline_kind_at_block_level_is_echoed() {
    let tokens = vec![Token::text("stray")];
    assert_eq!(Pipeline::default().render_or_echo("stray", &tokens), "stray");
}

#[test]
fn test_malformed_markdown_still_renders() {
    for source in [
        "$$\nunterminated math",
        "::: tip\nno closing fence",
        "```\nunclosed code",
        "| a | b |\n| --- |",
        "[^missing] reference",
        "**unbalanced *emphasis",
    ] {
        let html = markdown_to_html(source);
        assert!(!html.is_empty(), "{source}");
    }
}

#[test]
fn test_malformed_html_still_serializes() {
    let markdown = html_to_markdown("<p>open <b>bold <i>both</p><table><tr><td>cell");
    assert!(markdown.contains("open"));
    assert!(markdown.contains("cell"));
}

#[test]
fn test_deep_nesting_is_flattened() {
    let depth = 200;
    let html = format!("{}deep{}", "<div>".repeat(depth), "</div>".repeat(depth));
    assert_eq!(html_to_markdown(&html), "deep\n");

    let quotes = format!("{} nested", ">".repeat(depth));
    assert!(markdown_to_html(&quotes).contains("nested"));
}
