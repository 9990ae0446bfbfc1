use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn classify_reads_stdin() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["classify", "-"]).write_stdin("- [ ] todo\n");
    cmd.assert().success().stdout("markdown\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["classify", "-"]).write_stdin("<p>Hello</p>");
    cmd.assert().success().stdout("html\n");

    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["classify", "-"]).write_stdin("");
    cmd.assert().success().stdout("html\n");
}

#[test]
fn normalize_joins_table_rows() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["normalize", "-"])
        .write_stdin("| a | b |\n\n| --- | --- |\n\n| 1 | 2 |\n");
    cmd.assert()
        .success()
        .stdout("| a | b |\n| --- | --- |\n| 1 | 2 |\n");
}

#[test]
fn inspect_defaults_to_simple_listing() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["inspect", "-"]).write_stdin("Cost $x$");
    cmd.assert().success().stdout(
        predicate::str::starts_with("paragraph_open\n")
            .and(predicate::str::contains("math_inline \"x\"")),
    );
}

#[test]
fn inspect_json() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["inspect", "-", "tokens-json"])
        .write_stdin("::: warning\nHot\n:::");
    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value[0]["kind"], "container_open");
    assert_eq!(value[0]["info"], "warning");
}

#[test]
fn inspect_rejects_unknown_transform() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["inspect", "-", "ast-tag"]).write_stdin("x");
    cmd.assert().failure();
}

#[test]
fn verbose_logs_to_stderr_only() {
    let mut cmd = cargo_bin_cmd!("quill");
    cmd.args(["--verbose", "convert", "-", "--from", "markdown", "--to", "html"])
        .env_remove("RUST_LOG")
        .write_stdin("hello");
    cmd.assert()
        .success()
        .stdout("<p>hello</p>\n")
        .stderr(predicate::str::contains("rendering markdown"));
}
