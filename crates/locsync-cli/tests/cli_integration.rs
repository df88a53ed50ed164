mod helpers;

use helpers::{assert_contains_with_context, assert_no_ansi, run_cli};
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn help_lists_both_commands() {
    let (code, stdout, _stderr) = run_cli(&["--help"]);

    assert_eq!(code, 0);
    assert_contains_with_context(&stdout, "upload", "help should list the upload command");
    assert_contains_with_context(&stdout, "download", "help should list the download command");
}

#[test]
fn version_flag_prints_the_binary_name() {
    let (code, stdout, _stderr) = run_cli(&["--version"]);

    assert_eq!(code, 0);
    assert_contains_with_context(&stdout, "locsync", "--version should name the binary");
}

#[test]
fn upload_dry_run_prints_the_compiled_resource_text() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "messages.json",
        r#"[
            {"id": "GREETING", "defaultMessage": "Hello", "description": "shown on load"},
            {"id": "HIDDEN", "defaultMessage": "x",
             "description": {"skipUpload": true}}
        ]"#,
    );

    let (code, stdout, stderr) = run_cli(&[
        "--no-color",
        "upload",
        "--dry-run",
        "--base-url",
        "https://loc.example.com",
        "--pid",
        "PID168",
        "--group",
        "LG725",
        "--file-pattern",
        "*.json",
        "--root",
        dir.path().to_str().unwrap(),
    ]);

    assert_eq!(code, 0, "dry run should succeed.\nstderr:\n{stderr}");
    assert_contains_with_context(&stdout, "Found 1 messages.", "skipUpload entry must not count");
    assert_contains_with_context(&stdout, "/* shown on load */", "comment line should be present");
    assert_contains_with_context(
        &stdout,
        r#""GREETING" = "Hello";"#,
        "entry line should be present",
    );
    assert!(!stdout.contains("HIDDEN"), "skipped entry leaked into the catalog");
    assert_no_ansi(&stdout, "--no-color output must not contain ANSI escapes");
}

#[test]
fn upload_fails_on_conflicting_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.json",
        r#"[{"id": "A", "defaultMessage": "Hello", "description": "x"}]"#,
    );
    write(
        dir.path(),
        "b.json",
        r#"[{"id": "A", "defaultMessage": "Bye", "description": "x"}]"#,
    );

    let (code, _stdout, stderr) = run_cli(&[
        "--no-color",
        "upload",
        "--dry-run",
        "--base-url",
        "https://loc.example.com",
        "--pid",
        "PID168",
        "--group",
        "LG725",
        "--file-pattern",
        "*.json",
        "--root",
        dir.path().to_str().unwrap(),
    ]);

    assert_ne!(code, 0, "conflicting ids must fail the upload");
    assert_contains_with_context(
        &stderr,
        r#"duplicate message id "A""#,
        "the conflict report should name the id",
    );
}

#[test]
fn upload_without_pid_is_a_usage_error() {
    let (code, _stdout, stderr) = run_cli(&[
        "upload",
        "--dry-run",
        "--base-url",
        "https://loc.example.com",
        "--group",
        "LG725",
    ]);

    assert_eq!(code, 2);
    assert_contains_with_context(&stderr, "--pid", "the usage error should name the option");
}

#[test]
fn download_without_languages_is_a_usage_error() {
    let (code, _stdout, stderr) = run_cli(&[
        "download",
        "--base-url",
        "https://loc.example.com",
        "--pid",
        "PID168",
        "--group",
        "LG725",
    ]);

    assert_eq!(code, 2);
    assert_contains_with_context(
        &stderr,
        "--language",
        "the usage error should name the option",
    );
}
