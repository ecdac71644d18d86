//! Command-line behaviour: exit codes, error messages and text mode.
//!
//! These run the compiled binary and need neither pdfium nor docling: every
//! case either fails validation before an engine is touched or uses the
//! plain-text path.

use std::path::Path;
use std::process::{Command, Output};

const BOOK: &str = "The Project Gutenberg eBook of The Art of War\n\
\n\
*** START OF THE PROJECT GUTENBERG EBOOK THE ART OF WAR ***\n\
I. LAYING PLANS\n\
\n\
1. Sun Tzu said: The art of war is of vital importance to the State.\n\
*** END OF THE PROJECT GUTENBERG EBOOK THE ART OF WAR ***\n\
Section 1. General Terms of Use\n";

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_contextrie-convert"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn missing_file_exits_with_error() {
    let out = run(&["--no-progress", "/nonexistent/path.pdf"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Error: PDF file not found: /nonexistent/path.pdf"),
        "stderr: {stderr}"
    );
    assert!(out.stdout.is_empty());
}

#[test]
fn non_pdf_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let txt = write(dir.path(), "document.txt", "hello");

    let out = run(&["--no-progress", &txt]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Error: Expected a .pdf file, got: .txt"),
        "stderr: {stderr}"
    );
}

#[test]
fn text_mode_promotes_headings() {
    let dir = tempfile::tempdir().unwrap();
    let book = write(dir.path(), "book.txt", BOOK);

    let out = run(&["--quiet", "--text", &book]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(
        stdout,
        "\n## I. Laying Plans\n\n\n1. Sun Tzu said: The art of war is of vital importance to the State."
    );
}

#[test]
fn text_mode_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let book = write(dir.path(), "book.txt", BOOK);
    let md = dir.path().join("out/book.md");

    let out = run(&[
        "--quiet",
        "--text",
        &book,
        "-o",
        md.to_str().unwrap(),
    ]);

    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    let written = std::fs::read_to_string(&md).unwrap();
    assert!(written.contains("## I. Laying Plans"));
    assert!(!written.contains("General Terms"));
}

#[test]
fn text_mode_json_reports_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let book = write(dir.path(), "book.txt", BOOK);

    let out = run(&["--json", "--text", &book]);

    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["method"]["kind"], "fallback");
    assert_eq!(json["stats"]["headings_promoted"], 1);
    assert!(json["markdown"]
        .as_str()
        .unwrap()
        .starts_with("\n## I. Laying Plans\n"));
}

#[test]
fn text_without_markers_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let notes = write(dir.path(), "notes.txt", "CHAPTER ONE\nno markers here\n");

    let out = run(&["--quiet", "--text", &notes]);

    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}
