//! Post-processing: deterministic cleanup of engine-generated Markdown.
//!
//! Engines differ in how tidy their output is. Pdfium's text layer keeps
//! `\r\n` line endings, trailing spaces from justified text and form feeds
//! between columns; docling occasionally emits runs of blank lines around
//! removed figures. These rules fix that without touching content.
//!
//! ## Rule Order
//!
//! Line endings are normalised before trimming, invisible characters are
//! removed before blank-line collapsing (a line holding only a zero-width
//! space is blank), and the final-newline pass runs last.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to raw engine output.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF) and form feeds
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 2
/// 5. Ensure heading lines have a blank line before them
/// 6. Ensure the file ends with exactly one newline
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = normalise_heading_spacing(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace(['\r', '\u{000C}'], "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 5: Normalise heading spacing ────────────────────────────────────────

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6} \S").unwrap());

fn normalise_heading_spacing(input: &str) -> String {
    let mut result = String::with_capacity(input.len() + 64);
    for (i, line) in input.lines().enumerate() {
        if i > 0 && RE_HEADING.is_match(line) && !result.ends_with("\n\n") {
            result.push('\n');
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

// ── Rule 6: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
