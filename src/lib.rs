//! # contextrie-convert
//!
//! Convert PDF documents and plain-text book transcriptions to Markdown.
//!
//! The actual document understanding is delegated to a conversion engine
//! (pdfium's text layer, or the `docling` command for layout analysis and
//! OCR). This crate supplies the plumbing around it: input validation, engine
//! selection, output cleanup, and a heading-promotion fallback for plain text
//! that the engine cannot handle.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF ──▶ validate (.pdf, exists) ──▶ engine ──▶ postprocess ──▶ Markdown
//!
//! text ──▶ load (file / URL) ──▶ engine ──▶ postprocess ──▶ Markdown
//!                                  │
//!                                  └─ error ──▶ heading promotion ──▶ Markdown
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contextrie_convert::{convert_pdf, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().ocr(false).build()?;
//!     let output = convert_pdf("document.pdf", &config).await?;
//!     println!("{}", output.markdown);
//!     Ok(())
//! }
//! ```
//!
//! The fallback is a plain function and needs no runtime:
//!
//! ```rust
//! let md = contextrie_convert::promote_headings("*** START OF X ***\nCHAPTER ONE\ntext");
//! assert_eq!(md, "\n## Chapter One\n\ntext");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `contextrie-convert` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, EngineKind, PageSelection, PageSeparator};
pub use convert::{
    convert_pdf, convert_pdf_sync, convert_pdf_with, convert_source, convert_source_sync,
    convert_text, convert_text_with, convert_to_file,
};
pub use engine::{ConversionEngine, DoclingEngine, EngineOptions, PdfiumEngine};
pub use error::ConvertError;
pub use fallback::{promote_headings, promote_headings_with_stats};
pub use output::{ConversionMethod, ConversionOutput, ConversionStats};
pub use pipeline::input::validate_pdf_path;
