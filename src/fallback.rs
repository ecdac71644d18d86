//! Heading-promotion fallback: plain-text book transcription → Markdown.
//!
//! Used whenever the conversion engine cannot handle plain-text input. The
//! input is expected to look like a public-domain transcription: front matter,
//! a `*** START OF …` marker line, the body, an `*** END OF …` marker line and
//! back matter. Only the body is kept, and every ALL-CAPS line in it becomes a
//! level-2 heading.
//!
//! ## Scan
//!
//! ```text
//!            "*** START OF"              "*** END OF"
//!  Before ──────────────────▶ InBody ──────────────────▶ (stop)
//!    │                                                     ▲
//!    └─────────────────────── "*** END OF" ────────────────┘
//! ```
//!
//! The END check fires in either state, so an END marker that precedes every
//! START marker ends the scan before anything is emitted.

use std::borrow::Cow;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Substring that opens the body of a transcription.
pub const START_MARKER: &str = "*** START OF";

/// Substring that closes the body of a transcription.
pub const END_MARKER: &str = "*** END OF";

/// Where the scan currently is relative to the boilerplate markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyState {
    /// No START marker seen yet; lines are discarded.
    #[default]
    Before,
    /// Inside the body; lines are emitted or promoted.
    InBody,
}

/// Classification of a single stripped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    StartMarker,
    EndMarker,
    Content,
}

impl LineKind {
    /// Classify a stripped line. START wins when a line carries both markers.
    pub fn of(stripped: &str) -> Self {
        if stripped.contains(START_MARKER) {
            LineKind::StartMarker
        } else if stripped.contains(END_MARKER) {
            LineKind::EndMarker
        } else {
            LineKind::Content
        }
    }
}

/// Result of [`promote_headings_with_stats`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub markdown: String,
    /// Number of lines rewritten as `## ` headings.
    pub headings: usize,
}

/// Convert raw transcription text to Markdown.
///
/// Total: every input maps to some output, and `""` maps to `""`.
///
/// ```rust
/// use contextrie_convert::promote_headings;
///
/// let text = "*** START OF foo ***\nHELLO WORLD\nnormal text\n*** END OF foo ***\nignored";
/// assert_eq!(promote_headings(text), "\n## Hello World\n\nnormal text");
/// ```
pub fn promote_headings(text: &str) -> String {
    promote_headings_with_stats(text).markdown
}

/// Same as [`promote_headings`], also counting promoted headings.
pub fn promote_headings_with_stats(text: &str) -> Promotion {
    let mut state = BodyState::Before;
    let mut out: Vec<Cow<'_, str>> = Vec::new();
    let mut headings = 0usize;

    for line in text.split('\n') {
        let stripped = line.trim_matches(is_strip_space);

        match (LineKind::of(stripped), state) {
            (LineKind::StartMarker, _) => state = BodyState::InBody,
            (LineKind::EndMarker, _) => break,
            (LineKind::Content, BodyState::Before) => {}
            (LineKind::Content, BodyState::InBody) => {
                if is_heading_candidate(stripped) {
                    out.push(Cow::Borrowed(""));
                    out.push(Cow::Owned(format!("## {}", title_case(stripped))));
                    out.push(Cow::Borrowed(""));
                    headings += 1;
                } else {
                    out.push(Cow::Borrowed(line));
                }
            }
        }
    }

    Promotion {
        markdown: out.join("\n"),
        headings,
    }
}

/// `true` when a stripped line should become a heading: longer than two
/// characters, starts with a letter, and has no lowercase letters.
///
/// "Letter" means general category L (Lu, Ll, Lt, Lm, Lo). Letter-like
/// numerals such as `Ⅻ` (Nl) and combining marks do not count.
pub fn is_heading_candidate(stripped: &str) -> bool {
    let starts_letter = stripped.chars().next().is_some_and(is_letter);

    starts_letter && stripped.chars().count() > 2 && stripped.to_uppercase() == stripped
}

/// Title-case every run of cased letters: titlecase the first letter and
/// lowercase the rest.
///
/// A word boundary is any character without case, so `"DON'T"` becomes
/// `"Don'T"` and `"1ST"` becomes `"1St"`. Each run is lowercased as a whole,
/// so a word-final capital sigma becomes `ς`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find(is_cased) {
        out.push_str(&rest[..start]);
        let run = &rest[start..];
        let end = run.find(|c: char| !is_cased(c)).unwrap_or(run.len());
        let word = &run[..end];

        if let Some(first) = word.chars().next() {
            push_titlecase(&mut out, first);
            let lowered = word.to_lowercase();
            let skip: usize = first.to_lowercase().map(char::len_utf8).sum();
            out.push_str(&lowered[skip..]);
        }
        rest = &run[end..];
    }

    out.push_str(rest);
    out
}

/// Titlecase mapping of a run's first letter.
///
/// The Latin digraphs are the only letters that can appear in a heading
/// candidate whose titlecase form differs from their uppercase form.
fn push_titlecase(out: &mut String, c: char) {
    match c {
        '\u{01C4}'..='\u{01C6}' => out.push('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => out.push('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => out.push('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => out.push('\u{01F2}'),
        _ => out.extend(c.to_uppercase()),
    }
}

fn is_cased(c: char) -> bool {
    c.is_uppercase()
        || c.is_lowercase()
        || matches!(get_general_category(c), GeneralCategory::TitlecaseLetter)
}

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Unicode whitespace plus the ASCII information separators (FS, GS, RS, US),
/// which plain-text transcriptions occasionally carry at line edges.
fn is_strip_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}
