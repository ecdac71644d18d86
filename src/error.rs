//! Error types for the contextrie-convert library.
//!
//! Every fatal failure is a [`ConvertError`]. Two variants are special: the
//! *user errors* [`ConvertError::FileNotFound`] and
//! [`ConvertError::InvalidFileType`] are what the command-line tool reports
//! as a one-line `Error: …` message with exit status 1. Everything else is a
//! genuine failure of the environment or of the conversion engine.
//!
//! Engine errors on plain-text input are *not* fatal: the orchestration layer
//! in [`crate::convert`] catches them and substitutes the heading-promotion
//! fallback. They only surface when converting a PDF, where there is no text
//! to fall back on.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the contextrie-convert library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but does not carry a `.pdf` extension.
    #[error("Expected a .pdf file, got: {suffix}")]
    InvalidFileType { path: PathBuf, suffix: String },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r {:?}", path.display(), path)]
    PermissionDenied { path: PathBuf },

    /// A text source could not be read from disk.
    #[error("Failed to read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{}' is corrupt: {detail}", path.display())]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.", path.display())]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{}'", path.display())]
    WrongPassword { path: PathBuf },

    /// The page selection matched no page of the document.
    #[error("Page selection '{selection}' matches no page (document has {total} pages)")]
    PageOutOfRange { selection: String, total: usize },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The engine's executable or shared library could not be found.
    #[error("Conversion engine '{engine}' is not available.\n{hint}")]
    EngineUnavailable { engine: String, hint: String },

    /// The engine ran but reported a failure.
    #[error("Conversion engine '{engine}' failed: {detail}")]
    EngineFailed { engine: String, detail: String },

    /// The engine does not handle this kind of input.
    #[error("Conversion engine '{engine}' does not support {input} input")]
    Unsupported { engine: String, input: &'static str },

    /// The engine did not finish within the configured timeout.
    #[error("Conversion engine '{engine}' timed out after {secs}s\nIncrease --engine-timeout.")]
    EngineTimeout { engine: String, secs: u64 },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, place the library in the working\n\
directory, or install it system-wide. Alternatively use --engine docling.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// `true` for input-validation failures the CLI reports without a
    /// context chain: a missing file or a file that is not a PDF.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConvertError::FileNotFound { .. } | ConvertError::InvalidFileType { .. }
        )
    }
}
