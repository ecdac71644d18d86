//! Pdfium engine: extract each page's text layer in-process.
//!
//! Fast and dependency-free at runtime apart from the pdfium shared library,
//! but it only sees text that the PDF actually contains. Scanned pages come
//! back empty; pdfium has no OCR stage, so the `ocr` option only turns those
//! pages into warnings.
//!
//! The library is located in this order:
//! 1. `PDFIUM_LIB_PATH` (or an explicit path via [`PdfiumEngine::with_library`])
//! 2. the platform library name in the working directory
//! 3. the system library search path

use super::{ConversionEngine, EngineOptions};
use crate::config::PageSeparator;
use crate::error::ConvertError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct PdfiumEngine {
    library_path: Option<PathBuf>,
}

impl PdfiumEngine {
    /// Engine that honours `PDFIUM_LIB_PATH` when set.
    pub fn new() -> Self {
        Self {
            library_path: std::env::var_os("PDFIUM_LIB_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Engine bound to the pdfium library at `path`.
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, ConvertError> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| ConvertError::PdfiumBindingFailed(e.to_string()))?;

        Ok(Pdfium::new(bindings))
    }
}

impl Default for PdfiumEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionEngine for PdfiumEngine {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn convert_pdf(&self, path: &Path, options: &EngineOptions) -> Result<String, ConvertError> {
        let pdfium = self.bind()?;
        let password = options.password.as_deref();

        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    ConvertError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    ConvertError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                ConvertError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let indices = options.pages.to_indices(total_pages);
        if indices.is_empty() {
            return Err(ConvertError::PageOutOfRange {
                selection: options.pages.to_string(),
                total: total_pages,
            });
        }

        let mut extracted = Vec::with_capacity(indices.len());
        for idx in indices {
            let page = pages
                .get(idx as u16)
                .map_err(|e| ConvertError::EngineFailed {
                    engine: self.name().to_string(),
                    detail: format!("page {}: {}", idx + 1, e),
                })?;

            let text = page
                .text()
                .map_err(|e| ConvertError::EngineFailed {
                    engine: self.name().to_string(),
                    detail: format!("page {} text layer: {}", idx + 1, e),
                })?
                .all();

            if text.trim().is_empty() {
                if options.ocr {
                    warn!(
                        "Page {} has no text layer; pdfium cannot OCR it (try --engine docling)",
                        idx + 1
                    );
                } else {
                    debug!("Page {} has no text layer", idx + 1);
                }
            }

            extracted.push((idx + 1, text));
        }

        Ok(assemble_pages(&extracted, &options.page_separator))
    }
}

/// Join `(page_num, text)` pairs, skipping pages without text.
fn assemble_pages(pages: &[(usize, String)], separator: &PageSeparator) -> String {
    let mut out = String::new();
    let mut first = true;

    for (page_num, text) in pages {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if !first {
            out.push_str(&separator.render(*page_num));
        }
        out.push_str(text);
        first = false;
    }

    out
}
