//! Serializer tests (HTML → Markdown)
//!
//! Structure is checked by parsing the output again with comrak where the
//! exact spacing of comrak's printer does not matter.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use quill_babel::formats::markdown::serializer::{serialize, SerializeOptions};
use quill_babel::html_to_markdown;

fn comrak_kinds<'a>(node: &'a AstNode<'a>, kinds: &mut Vec<&'static str>) {
    let kind = match &node.data.borrow().value {
        NodeValue::Paragraph => "Paragraph",
        NodeValue::Heading(_) => "Heading",
        NodeValue::List(_) => "List",
        NodeValue::Item(_) => "Item",
        NodeValue::BlockQuote => "BlockQuote",
        NodeValue::CodeBlock(_) => "CodeBlock",
        NodeValue::Table(_) => "Table",
        NodeValue::Link(_) => "Link",
        NodeValue::Strong => "Strong",
        _ => "",
    };
    if !kind.is_empty() {
        kinds.push(kind);
    }
    for child in node.children() {
        comrak_kinds(child, kinds);
    }
}

fn reparse(markdown: &str) -> Vec<&'static str> {
    let arena = Arena::new();
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    let root = parse_document(&arena, markdown, &options);
    let mut kinds = Vec::new();
    comrak_kinds(root, &mut kinds);
    kinds
}

#[test]
fn test_editor_output_with_wrappers() {
    let html = r#"<div class="editor"><h1>Notes</h1>
        <p>First <strong>bold</strong> point.</p>
        <blockquote><p>Quoted</p></blockquote>
        <ul><li>one</li><li>two<ul><li>nested</li></ul></li></ul></div>"#;
    let markdown = html_to_markdown(html);
    assert!(markdown.starts_with("# Notes\n\nFirst **bold** point.\n"));
    assert!(markdown.contains("> Quoted"));

    let kinds = reparse(&markdown);
    assert_eq!(kinds.iter().filter(|k| **k == "List").count(), 2);
    assert!(kinds.contains(&"BlockQuote"));
}

#[test]
fn test_table_without_thead() {
    let html = "<table><tr><td>h1</td><td>h2</td></tr><tr><td>a</td><td>b</td></tr></table>";
    let markdown = html_to_markdown(html);
    assert!(reparse(&markdown).contains(&"Table"));
    assert_eq!(markdown.lines().count(), 3);
}

#[test]
fn test_line_break_inside_table_cell_becomes_space() {
    let html = "<table><thead><tr><th>a</th></tr></thead><tbody><tr><td>x<br>y</td></tr></tbody></table>";
    let markdown = html_to_markdown(html);
    assert!(markdown.contains("x y"));
    assert_eq!(markdown.lines().count(), 3);
}

#[test]
fn test_code_block_language_from_lang_prefix() {
    let markdown = html_to_markdown("<pre class=\"lang-python\"><code>print(1)</code></pre>");
    assert!(markdown.lines().next().unwrap().contains("python"));
    assert!(reparse(&markdown).contains(&"CodeBlock"));
}

#[test]
fn test_admonition_with_default_title_omits_it() {
    let html = "<div class=\"admonition admonition-warning\"><p class=\"admonition-title\">Warning</p><p>Careful</p></div>";
    assert_eq!(html_to_markdown(html), "::: warning\n\nCareful\n\n:::\n");
}

#[test]
fn test_nested_admonitions_are_flattened() {
    let html = "<div class=\"admonition admonition-note\"><p>Outer</p>\
                <div class=\"admonition admonition-tip\"><p>Inner</p></div></div>";
    let markdown = html_to_markdown(html);
    assert_eq!(markdown.matches(":::").count(), 2);
    assert!(markdown.contains("Outer"));
    assert!(markdown.contains("Inner"));
}

#[test]
fn test_plus_bullets() {
    let options = SerializeOptions { bullet: '+' };
    let markdown = serialize("<ul><li>a</li></ul>", &options).unwrap();
    assert_eq!(markdown, "+ a\n");
}

#[test]
fn test_whitespace_only_document() {
    assert_eq!(html_to_markdown("<p>   </p>\n<div>\n</div>"), "");
}
