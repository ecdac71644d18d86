//! Configuration types for document-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The CLI maps each flag onto one field,
//! and library callers set only what they care about.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use contextrie_convert::{ConversionConfig, EngineKind};
///
/// let config = ConversionConfig::builder()
///     .ocr(false)
///     .engine(EngineKind::Docling)
///     .build()
///     .unwrap();
/// assert!(!config.ocr);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Ask the engine to run OCR on pages without a text layer. Default: true.
    ///
    /// Disable for born-digital PDFs. Only engines with an OCR stage honour it.
    pub ocr: bool,

    /// Which engine performs the conversion. Default: [`EngineKind::Docling`],
    /// the only engine that honours `ocr`.
    pub engine: EngineKind,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Page separator in assembled output. Default: None.
    pub page_separator: PageSeparator,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Executable invoked by the docling engine. Default: `"docling"`.
    pub docling_command: String,

    /// Wall-clock limit for a single engine run, in seconds. Default: 600.
    pub engine_timeout_secs: u64,

    /// Download timeout for URL text sources in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Run the post-processing rules over engine output. Default: true.
    pub clean_output: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            ocr: true,
            engine: EngineKind::default(),
            pages: PageSelection::default(),
            page_separator: PageSeparator::default(),
            password: None,
            docling_command: "docling".to_string(),
            engine_timeout_secs: 600,
            download_timeout_secs: 120,
            clean_output: true,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn ocr(mut self, v: bool) -> Self {
        self.config.ocr = v;
        self
    }

    pub fn engine(mut self, kind: EngineKind) -> Self {
        self.config.engine = kind;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn docling_command(mut self, cmd: impl Into<String>) -> Self {
        self.config.docling_command = cmd.into();
        self
    }

    pub fn engine_timeout_secs(mut self, secs: u64) -> Self {
        self.config.engine_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn clean_output(mut self, v: bool) -> Self {
        self.config.clean_output = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.docling_command.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "docling command must not be empty".into(),
            ));
        }
        if c.engine_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "engine timeout must be ≥ 1s".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "download timeout must be ≥ 1s".into(),
            ));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(ConvertError::InvalidConfig(format!(
                    "invalid page range {start}-{end}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Backend that performs the PDF conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// The external `docling` command: layout analysis, tables and OCR. (default)
    #[default]
    Docling,
    /// Native text-layer extraction through pdfium. No OCR.
    Pdfium,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Pdfium => "pdfium",
            EngineKind::Docling => "docling",
        }
    }
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PageSelection::All)
    }
}

/// Renders in the `--pages` syntax: `all`, `5`, `3-15`, `1,3,5`.
impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSelection::All => f.write_str("all"),
            PageSelection::Single(p) => write!(f, "{p}"),
            PageSelection::Range(start, end) => write!(f, "{start}-{end}"),
            PageSelection::Set(pages) => {
                let parts: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

/// How to separate pages in the assembled Markdown output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSeparator {
    /// No separator; pages joined with "\n\n". (default)
    #[default]
    None,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// HTML comment with page number: "<!-- page N -->"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }
}
