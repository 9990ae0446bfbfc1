//! Property tests for the pipeline invariants

use proptest::prelude::*;
use quill_babel::{
    classify_format, html_to_markdown, markdown_to_html, normalize_tables, ContentFormat,
};

/// Lines that exercise the table normalizer: rows, dividers, blanks, prose.
fn table_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("| a | b |".to_string()),
        Just("| --- | --- |".to_string()),
        Just("| :--- | ---: |".to_string()),
        Just("| 1 | 2 |".to_string()),
        Just("| x | y | z |".to_string()),
        Just("| only |".to_string()),
        Just(String::new()),
        Just("   ".to_string()),
        Just("prose line".to_string()),
        "[a-z ]{0,12}",
    ]
}

fn document(line: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    prop::collection::vec(line, 0..16).prop_map(|lines| lines.join("\n"))
}

fn latex() -> impl Strategy<Value = String> {
    "[a-z0-9+=^_(){}]([a-z0-9+=^_(){} \\\\]{0,18}[a-z0-9+=^_(){}])?"
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in document(table_line())) {
        let once = normalize_tables(&text);
        prop_assert_eq!(normalize_tables(&once), once);
    }

    #[test]
    fn normalize_never_touches_fenced_code(body in document(table_line())) {
        let text = format!("```\n{body}\n```\n");
        prop_assert_eq!(normalize_tables(&text), text);
    }

    #[test]
    fn normalize_only_removes_blank_lines(text in document(table_line())) {
        let normalized = normalize_tables(&text);
        let content = |s: &str| -> Vec<String> {
            s.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect()
        };
        prop_assert_eq!(content(&normalized), content(&text));
    }

    #[test]
    fn classify_is_total_and_deterministic(text in "\\PC{0,200}") {
        prop_assert_eq!(classify_format(&text), classify_format(&text));
    }

    #[test]
    fn plain_words_are_html(words in prop::collection::vec("[a-zA-Z]{1,10}", 1..20)) {
        let text = words.join(" ");
        prop_assert_eq!(classify_format(&text), ContentFormat::Html);
    }

    #[test]
    fn rendered_prose_classifies_as_html(words in prop::collection::vec("[a-z]{1,8}", 1..12)) {
        let markdown = format!("# {}\n\n{}\n\n- {}", words[0], words.join(" "), words[0]);
        prop_assert_eq!(classify_format(&markdown), ContentFormat::Markdown);
        prop_assert_eq!(classify_format(&markdown_to_html(&markdown)), ContentFormat::Html);
    }

    #[test]
    fn block_math_round_trips(content in latex()) {
        let markdown = format!("$$\n{content}\n$$");
        let back = html_to_markdown(&markdown_to_html(&markdown));
        prop_assert_eq!(back, format!("{markdown}\n"));
    }

    #[test]
    fn inline_math_round_trips(content in latex()) {
        let markdown = format!("Value ${content}$ here");
        let back = html_to_markdown(&markdown_to_html(&markdown));
        prop_assert_eq!(back, format!("{markdown}\n"));
    }

    #[test]
    fn tables_round_trip(
        rows in prop::collection::vec(prop::collection::vec("[a-z0-9]{1,6}", 3), 1..4)
    ) {
        let row = |cells: &Vec<String>| format!("| {} |", cells.join(" | "));
        let mut lines = vec![row(&rows[0]), "| --- | :---: | ---: |".to_string()];
        lines.extend(rows[1..].iter().map(row));
        let markdown = lines.join("\n");

        let html = markdown_to_html(&markdown);
        prop_assert!(html.contains("<table>"));
        prop_assert_eq!(markdown_to_html(&html_to_markdown(&html)), html);
    }

    #[test]
    fn conversions_never_panic(text in "\\PC{0,200}") {
        let _ = markdown_to_html(&text);
        let _ = html_to_markdown(&text);
    }
}
