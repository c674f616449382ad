use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_lua-doc-extractor")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn generated_by() -> String {
    format!(
        "---Generated by {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_lua() {
    let input = std::fs::read_to_string(fixture_path("widgets.cpp")).unwrap();
    let body = std::fs::read_to_string(fixture_path("widgets.expected.lua")).unwrap();
    let expected = format!(
        "---!!! DO NOT MANUALLY EDIT THIS FILE !!!\n{}\n---\n---@meta\n\n{}",
        generated_by(),
        body
    );

    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn stdin_mode_empty_input() {
    let assert = cmd().write_stdin("int main() { return 0; }\n").assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.ends_with("---@meta\n"), "got: {}", output);
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();
    let source = fixture_path("widgets.cpp");

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(&source)
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("widgets.lua")).unwrap();
    let body = std::fs::read_to_string(fixture_path("widgets.expected.lua")).unwrap();
    assert!(output.starts_with("---!!! DO NOT MANUALLY EDIT THIS FILE !!!\n"));
    assert!(output.contains(&generated_by()));
    assert!(output.contains(&format!("---Source: {}\n---\n---@meta\n\n", source)));
    assert!(output.ends_with(&body), "got: {}", output);
}

#[test]
fn file_mode_multiple_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("widgets.cpp"))
        .arg(fixture_path("more_widgets.cpp"))
        .assert()
        .success();

    assert!(dir.path().join("widgets.lua").exists());
    assert!(dir.path().join("more_widgets.lua").exists());
}

#[test]
fn dest_alias_is_accepted() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["--dest", dir.path().to_str().unwrap()])
        .arg(fixture_path("more_widgets.cpp"))
        .assert()
        .success();

    assert!(dir.path().join("more_widgets.lua").exists());
}

#[test]
fn single_file_merges_tables_across_inputs() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--file", "library.lua"])
        .arg(fixture_path("widgets.cpp"))
        .arg(fixture_path("more_widgets.cpp"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("library.lua")).unwrap();
    assert!(output.contains("---Sources:\n--- - "));
    assert_eq!(output.matches("Widgets = {").count(), 1);
    // Inputs are sorted, so more_widgets.cpp comes first.
    assert!(
        output.contains(
            "---More widgets.\n---\n---Widget handling.\nWidgets = {\n\
             \t---@type integer How many widgets.\n\tcount = nil\n}"
        ),
        "got: {}",
        output
    );
}

#[test]
fn directory_input_is_scanned() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR")))
        .assert()
        .success();

    assert!(dir.path().join("widgets.lua").exists());
    assert!(dir.path().join("more_widgets.lua").exists());
    assert!(dir.path().join("broken.lua").exists());
    assert!(!dir.path().join("widgets.expected.lua").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("widgets.cpp"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unmatched_pattern_warns() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(format!("{}/tests/fixtures/*.nothing", env!("CARGO_MANIFEST_DIR")))
        .assert()
        .success()
        .stderr(predicate::str::contains("no files matched"));
}

// -- repository links --

#[test]
fn repo_adds_source_links() {
    let dir = TempDir::new().unwrap();
    let mut input = NamedTempFile::with_suffix(".cpp").unwrap();
    input
        .write_all(b"/***\n * @table MyTable\n */\n\n/***\n * @function MyTable.Boop\n * @param x number\n */\n")
        .unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--repo", "https://github.com/user/project/blob/main/"])
        .arg(input.path().to_str().unwrap())
        .assert()
        .success();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(entries.len(), 1, "Should create one output file");

    let output = std::fs::read_to_string(entries[0].path()).unwrap();
    assert!(output.contains("<a href=\"https://github.com/user/project/blob/main/"));
    assert!(output.contains("#L1-L3\" target=\"_blank\">source</a>]\nMyTable = {}"));
    assert!(output.contains("#L5-L8\" target=\"_blank\">source</a>]\n---\n---@param x number\n"));
}

// -- diagnostics --

#[test]
fn parse_errors_are_reported_but_output_is_written() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("broken.cpp"))
        .assert()
        .success()
        .stderr(predicate::str::contains("unclosed code span"));

    let output = std::fs::read_to_string(dir.path().join("broken.lua")).unwrap();
    assert!(output.ends_with("\nFine = {}\n"));
}

#[test]
fn unclosed_comment_warns() {
    let dir = TempDir::new().unwrap();
    let mut input = NamedTempFile::with_suffix(".cpp").unwrap();
    input.write_all(b"/***\n * @table Lost\n").unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(input.path().to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("never closed"));
}

#[test]
fn quiet_hides_warnings() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-q", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("broken.cpp"))
        .assert()
        .success()
        .stderr(predicate::str::contains("unclosed code span").not());
}
