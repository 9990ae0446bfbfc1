//! Format classification through the public entry point

use quill_babel::{classify_format, ContentFormat};

#[test]
fn test_markdown_documents() {
    let documents = [
        "# Heading\n\nText",
        "Intro\n\n- item one\n- item two",
        "```\ncode\n```",
        "A sentence with **bold** text.",
        "$$\nx^2\n$$",
        "Energy is $E = mc^2$.",
        "::: warning\nCareful\n:::",
        "| a | b |\n| --- | --- |\n| 1 | 2 |",
        "Claim[^1]\n\n[^1]: Source",
        "> a quote",
    ];
    for doc in documents {
        assert_eq!(classify_format(doc), ContentFormat::Markdown, "{doc}");
    }
}

#[test]
fn test_html_documents() {
    let documents = [
        "<p>Hello</p>",
        "<div class=\"admonition admonition-tip\">\n<p class=\"admonition-title\">Tip</p>\n</div>",
        "<h1>Title</h1>\n<p>Body with <strong>bold</strong></p>",
        "<!-- comment -->",
    ];
    for doc in documents {
        assert_eq!(classify_format(doc), ContentFormat::Html, "{doc}");
    }
}

#[test]
fn test_plain_text_is_never_markdown() {
    for doc in ["", "   ", "Hello world", "Two\nlines of prose.", "Costs 5 dollars"] {
        assert_eq!(classify_format(doc), ContentFormat::Html, "{doc:?}");
    }
}

#[test]
fn test_markdown_markers_inside_html_mean_markdown() {
    assert_eq!(classify_format("<div>**bold** text</div>"), ContentFormat::Markdown);
    assert_eq!(classify_format("<div>bold text</div>"), ContentFormat::Html);
}
