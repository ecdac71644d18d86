//! Conversion engines: the backends that turn a document into Markdown.
//!
//! Everything hard (PDF parsing, layout analysis, OCR) happens behind the
//! [`ConversionEngine`] trait. The crate ships two implementations:
//!
//! | Engine | Backend | OCR | Text input |
//! |--------|---------|-----|------------|
//! | [`PdfiumEngine`]  | pdfium text layer, in-process | no  | no |
//! | [`DoclingEngine`] | `docling` command, subprocess | yes | no |
//!
//! Engine calls are blocking. The async entry points in [`crate::convert`]
//! run them on tokio's blocking pool.
//!
//! Library callers can pass their own engine to
//! [`crate::convert::convert_pdf_with`] / [`crate::convert::convert_text_with`].

pub mod docling;
pub mod pdfium;

pub use docling::DoclingEngine;
pub use pdfium::PdfiumEngine;

use crate::config::{ConversionConfig, EngineKind, PageSelection, PageSeparator};
use crate::error::ConvertError;
use std::path::Path;
use std::sync::Arc;

/// Per-call options handed to an engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub ocr: bool,
    pub pages: PageSelection,
    pub page_separator: PageSeparator,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl From<&ConversionConfig> for EngineOptions {
    fn from(config: &ConversionConfig) -> Self {
        Self {
            ocr: config.ocr,
            pages: config.pages.clone(),
            page_separator: config.page_separator.clone(),
            password: config.password.clone(),
            timeout_secs: config.engine_timeout_secs,
        }
    }
}

/// A document-to-Markdown backend.
///
/// Implementations must be `Send + Sync`: the orchestration layer moves an
/// `Arc<dyn ConversionEngine>` onto the blocking pool.
pub trait ConversionEngine: Send + Sync {
    /// Short identifier used in logs and in [`crate::output::ConversionMethod`].
    fn name(&self) -> &str;

    /// Convert the PDF at `path` to Markdown.
    fn convert_pdf(&self, path: &Path, options: &EngineOptions) -> Result<String, ConvertError>;

    /// Convert raw text to Markdown.
    ///
    /// The default rejects text input, which makes the orchestration layer
    /// use the heading-promotion fallback.
    fn convert_text(&self, _text: &str, _options: &EngineOptions) -> Result<String, ConvertError> {
        Err(ConvertError::Unsupported {
            engine: self.name().to_string(),
            input: "plain-text",
        })
    }
}

/// Instantiate the engine selected in `config`.
pub fn engine_for(config: &ConversionConfig) -> Arc<dyn ConversionEngine> {
    match config.engine {
        EngineKind::Pdfium => Arc::new(PdfiumEngine::new()),
        EngineKind::Docling => Arc::new(DoclingEngine::new(config.docling_command.clone())),
    }
}
