//! Markdown → HTML → Markdown → HTML
//!
//! The markdown written by the serializer is allowed to differ in spacing and
//! markers from the source, but it must render to the same HTML.

use quill_babel::{classify_format, html_to_markdown, markdown_to_html, ContentFormat};

fn assert_stable(markdown: &str) {
    let first = markdown_to_html(markdown);
    let back = html_to_markdown(&first);
    let second = markdown_to_html(&back);
    assert_eq!(first, second, "source:\n{markdown}\nserialized:\n{back}");
}

#[test]
fn test_table_scenario() {
    let markdown = "| a | b |\n| --- | --- |\n| 1 | 2 |";
    assert_eq!(classify_format(markdown), ContentFormat::Markdown);

    let html = markdown_to_html(markdown);
    assert!(html.contains("<th>a</th>"));
    assert!(html.contains("<td>2</td>"));
    assert_eq!(classify_format(&html), ContentFormat::Html);

    let back = html_to_markdown(&html);
    assert_eq!(back.lines().count(), 3);
    assert!(back.starts_with("| a | b |"));
    assert_eq!(markdown_to_html(&back), html);
}

#[test]
fn test_blank_line_table_is_repaired() {
    let html = markdown_to_html("| a | b |\n\n| --- | --- |\n\n| 1 | 2 |");
    assert!(html.contains("<table>"));
    assert!(html.contains("<td>1</td>"));
}

#[test]
fn test_aligned_table() {
    assert_stable("| l | c | r |\n| :--- | :---: | ---: |\n| 1 | 2 | 3 |");
}

#[test]
fn test_inline_formatting() {
    assert_stable("Some **bold**, *soft*, ~~gone~~ and `code` with a [link](https://x.test).");
}

#[test]
fn test_headings_and_quotes() {
    assert_stable("# Title\n\n## Section\n\n> quoted text\n\nAfter.");
}

#[test]
fn test_lists() {
    assert_stable("- a\n- b\n  - nested\n\n1. one\n2. two");
    assert_stable("- [x] done\n- [ ] open");
}

#[test]
fn test_math() {
    assert_stable("$$\n\\int_0^1 x^2 \\, dx\n$$\n\nInline $a < b$ too.");
    assert_eq!(
        html_to_markdown(&markdown_to_html("$$\nE = mc^2\n$$")),
        "$$\nE = mc^2\n$$\n"
    );
}

#[test]
fn test_admonitions() {
    assert_stable("::: tip\nUse the **index**.\n:::");
    assert_stable("::: danger Hot surface\nDo not touch.\n:::");
    assert_eq!(
        html_to_markdown(&markdown_to_html("::: note Heads up\nBody\n:::")),
        "::: note Heads up\n\nBody\n\n:::\n"
    );
}

#[test]
fn test_footnotes() {
    let markdown = "Claim[^src] and another[^2].\n\n[^src]: The source.\n[^2]: Second.";
    assert_stable(markdown);
    let back = html_to_markdown(&markdown_to_html(markdown));
    assert!(back.contains("Claim[^src] and another[^2]."));
    assert!(back.contains("[^src]: The source."));
}

#[test]
fn test_definition_lists() {
    assert_stable("Term\n: First meaning\n: Second meaning");
}

#[test]
fn test_code_fence() {
    assert_stable("```rust\nfn main() {\n    println!(\"<hi>\");\n}\n```");
}

#[test]
fn test_literal_dollars_stay_text() {
    let html = markdown_to_html("Price \\$5 or \\$10 today");
    assert_eq!(html, "<p>Price $5 or $10 today</p>\n");

    let back = html_to_markdown(&html);
    assert_eq!(back, "Price \\$5 or \\$10 today\n");
    assert_eq!(markdown_to_html(&back), html);

    let from_editor = html_to_markdown("<p>$$ not math $$</p><p>$x$</p>");
    let html = markdown_to_html(&from_editor);
    assert!(!html.contains("math-inline") && !html.contains("math-block"), "{html}");
}

#[test]
fn test_literal_container_fence_stays_text() {
    let back = html_to_markdown("<p>::: tip is how callouts start</p>");
    assert_eq!(back, "\\::: tip is how callouts start\n");
    let html = markdown_to_html(&back);
    assert!(!html.contains("admonition"), "{html}");
    assert!(html.contains("::: tip is how callouts start"));
}
