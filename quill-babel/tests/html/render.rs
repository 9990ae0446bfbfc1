//! Renderer tests (Markdown → HTML)

use insta::assert_snapshot;
use quill_babel::formats::html::render;
use quill_babel::formats::markdown::tokenize;
use quill_babel::{markdown_to_html, AdmonitionKind, RenderOptions};

fn render_with(markdown: &str, options: &RenderOptions) -> String {
    render(&tokenize(markdown), options).unwrap()
}

#[test]
fn test_simple_table() {
    let html = markdown_to_html("| a | b |\n| --- | --- |\n| 1 | 2 |");
    assert_snapshot!(html, @r###"
    <div class="table-wrapper">
    <table>
    <thead>
    <tr>
    <th>a</th>
    <th>b</th>
    </tr>
    </thead>
    <tbody>
    <tr>
    <td>1</td>
    <td>2</td>
    </tr>
    </tbody>
    </table>
    </div>
    "###);
}

#[test]
fn test_heading_and_escaping() {
    assert_eq!(markdown_to_html("## Title"), "<h2>Title</h2>\n");
    assert_eq!(
        markdown_to_html("a < b & \"c\""),
        "<p>a &lt; b &amp; &quot;c&quot;</p>\n"
    );
}

#[test]
fn test_tight_list() {
    assert_snapshot!(markdown_to_html("- a\n- b"), @r###"
    <ul>
    <li>a</li>
    <li>b</li>
    </ul>
    "###);
}

#[test]
fn test_task_list() {
    let html = markdown_to_html("- [x] done\n- [ ] open");
    assert!(html.contains(
        "<li class=\"task-list-item\"><input class=\"task-list-item-checkbox\" type=\"checkbox\" disabled checked> done</li>"
    ));
    assert!(html.contains("type=\"checkbox\" disabled> open</li>"));
}

#[test]
fn test_math_is_escaped_and_tagged() {
    assert_eq!(
        markdown_to_html("$$\na < b\n$$"),
        "<div class=\"math-block\" data-config=\"kind=math&amp;variant=block\">$$\na &lt; b\n$$</div>\n"
    );
    let inline = markdown_to_html("Let $x$ be");
    assert!(inline.starts_with("<p>Let <span class=\"math-inline\""));
    assert!(inline.ends_with(">$x$</span> be</p>\n"));
}

#[test]
fn test_admonition_titles() {
    let html = markdown_to_html("::: tip\nBody\n:::");
    assert!(html.starts_with("<div class=\"admonition admonition-tip\""));
    assert!(html.contains("<p class=\"admonition-title\">Tip</p>"));
    assert!(html.trim_end().ends_with("</div>"));

    let explicit = markdown_to_html("::: warning Mind the gap\nBody\n:::");
    assert!(explicit.contains("<p class=\"admonition-title\">Mind the gap</p>"));

    let options = RenderOptions::default().with_admonition_title(AdmonitionKind::Tip, "Hint");
    let configured = render_with("::: tip\nBody\n:::", &options);
    assert!(configured.contains("<p class=\"admonition-title\">Hint</p>"));
}

#[test]
fn test_code_class_prefix() {
    let options = RenderOptions {
        code_class_prefix: "lang-".to_string(),
        ..RenderOptions::default()
    };
    assert_eq!(
        render_with("```rust\nfn main() {}\n```", &options),
        "<pre><code class=\"lang-rust\">fn main() {}\n</code></pre>\n"
    );
}

#[test]
fn test_footnotes() {
    let html = markdown_to_html("Claim[^a].\n\n[^a]: The note.");
    assert!(html.contains("<sup class=\"footnote-ref\""));
    assert!(html.contains("<a href=\"#fn1\" id=\"fnref1\">[1]</a></sup>"));
    assert!(html.contains("<section class=\"footnotes\">"));
    assert!(html.contains("<li id=\"fn1\" class=\"footnote-item\""));
    assert!(html.contains("class=\"footnote-backref\""));
    assert!(!html.contains("[^a]"));
}

#[test]
fn test_definition_list() {
    let html = markdown_to_html("Term\n: Meaning");
    assert!(html.starts_with("<dl>\n<dt>Term</dt>\n<dd>"));
    assert!(html.contains("Meaning"));
    assert!(html.ends_with("</dd>\n</dl>\n"));
}

#[test]
fn test_raw_html_passes_through() {
    let html = markdown_to_html("<aside>kept</aside>\n\ntext");
    assert!(html.starts_with("<aside>kept</aside>"));
    assert!(html.ends_with("<p>text</p>\n"));
}
