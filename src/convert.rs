//! Conversion entry points.
//!
//! Two kinds of input, two error policies:
//!
//! * **PDF** ([`convert_pdf`]) — validate the path, hand it to the engine and
//!   return whatever it produces. Engine errors are fatal: there is no text to
//!   fall back on.
//! * **Plain text** ([`convert_text`], [`convert_source`]) — try the engine
//!   first; on *any* engine error log a diagnostic and substitute the
//!   heading-promotion fallback. These never fail once the text is loaded.

use crate::config::ConversionConfig;
use crate::engine::{engine_for, ConversionEngine, EngineOptions};
use crate::error::ConvertError;
use crate::fallback::promote_headings_with_stats;
use crate::output::{ConversionMethod, ConversionOutput, ConversionStats};
use crate::pipeline::{input, postprocess};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a PDF file to Markdown with the engine selected in `config`.
///
/// # Errors
/// - [`ConvertError::FileNotFound`] / [`ConvertError::InvalidFileType`] when
///   the path fails validation
/// - any engine error (binding, corrupt PDF, subprocess failure, timeout)
pub async fn convert_pdf(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    convert_pdf_with(engine_for(config), pdf_path, config).await
}

/// [`convert_pdf`] with a caller-supplied engine.
pub async fn convert_pdf_with(
    engine: Arc<dyn ConversionEngine>,
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let start = Instant::now();
    let path = input::validate_pdf_path(pdf_path)?;
    info!("Converting {} with {}", path.display(), engine.name());

    let input_bytes = tokio::fs::metadata(&path)
        .await
        .map(|m| m.len())
        .unwrap_or(0);

    let options = EngineOptions::from(config);
    let name = engine.name().to_string();
    let raw = tokio::task::spawn_blocking(move || engine.convert_pdf(&path, &options))
        .await
        .map_err(|e| ConvertError::Internal(format!("Engine task panicked: {}", e)))??;

    let markdown = if config.clean_output {
        postprocess::clean_markdown(&raw)
    } else {
        raw
    };

    let stats = ConversionStats {
        input_bytes,
        output_bytes: markdown.len() as u64,
        headings_promoted: 0,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} bytes in {}ms",
        stats.output_bytes, stats.duration_ms
    );

    Ok(ConversionOutput {
        markdown,
        method: ConversionMethod::Engine(name),
        stats,
    })
}

/// Convert plain text to Markdown, falling back to heading promotion when the
/// engine fails.
pub async fn convert_text(text: impl Into<String>, config: &ConversionConfig) -> ConversionOutput {
    convert_text_with(engine_for(config), text, config).await
}

/// [`convert_text`] with a caller-supplied engine.
pub async fn convert_text_with(
    engine: Arc<dyn ConversionEngine>,
    text: impl Into<String>,
    config: &ConversionConfig,
) -> ConversionOutput {
    let start = Instant::now();
    let text = text.into();
    let input_bytes = text.len() as u64;
    let name = engine.name().to_string();
    let options = EngineOptions::from(config);

    let engine_text = text.clone();
    let attempt = tokio::task::spawn_blocking(move || engine.convert_text(&engine_text, &options))
        .await
        .unwrap_or_else(|e| Err(ConvertError::Internal(format!("Engine task panicked: {}", e))));

    let (markdown, method, headings_promoted) = match attempt {
        Ok(raw) => {
            debug!("{} converted {} bytes of text", name, input_bytes);
            let markdown = if config.clean_output {
                postprocess::clean_markdown(&raw)
            } else {
                raw
            };
            (markdown, ConversionMethod::Engine(name), 0)
        }
        Err(e) => {
            warn!("{} conversion failed ({}), using heading-promotion fallback", name, e);
            let promotion = promote_headings_with_stats(&text);
            (promotion.markdown, ConversionMethod::Fallback, promotion.headings)
        }
    };

    let stats = ConversionStats {
        input_bytes,
        output_bytes: markdown.len() as u64,
        headings_promoted,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Text conversion via {}: {} → {} bytes",
        method, stats.input_bytes, stats.output_bytes
    );

    ConversionOutput {
        markdown,
        method,
        stats,
    }
}

/// Load a text source (local path or HTTP/HTTPS URL) and convert it with
/// [`convert_text`].
pub async fn convert_source(
    source: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let text = input::resolve_text_source(source.as_ref(), config.download_timeout_secs).await?;
    Ok(convert_text(text, config).await)
}

/// Write Markdown to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    markdown: &str,
    output_path: impl AsRef<Path>,
) -> Result<(), ConvertError> {
    let path = output_path.as_ref();
    let write_err = |e| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, markdown).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    info!("Written to {} ({} chars)", path.display(), markdown.chars().count());
    Ok(())
}

/// Synchronous wrapper around [`convert_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_pdf_sync(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    runtime()?.block_on(convert_pdf(pdf_path, config))
}

/// Synchronous wrapper around [`convert_source`].
pub fn convert_source_sync(
    source: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    runtime()?.block_on(convert_source(source, config))
}

fn runtime() -> Result<tokio::runtime::Runtime, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::promote_headings;
    use std::sync::atomic::{AtomicBool, Ordering};

    const BOOK: &str = "Preface\n*** START OF THE BOOK ***\nCHAPTER ONE\nIt was a dark night.\n*** END OF THE BOOK ***\nLicense";

    /// Engine whose text conversion always fails.
    struct Broken;

    impl ConversionEngine for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn convert_pdf(&self, _path: &Path, _options: &EngineOptions) -> Result<String, ConvertError> {
            Err(ConvertError::EngineFailed {
                engine: "broken".into(),
                detail: "always fails".into(),
            })
        }

        fn convert_text(&self, _text: &str, _options: &EngineOptions) -> Result<String, ConvertError> {
            Err(ConvertError::EngineFailed {
                engine: "broken".into(),
                detail: "always fails".into(),
            })
        }
    }

    /// Engine that echoes a fixed document and records the OCR flag.
    struct Canned {
        saw_ocr: AtomicBool,
    }

    impl ConversionEngine for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn convert_pdf(&self, _path: &Path, options: &EngineOptions) -> Result<String, ConvertError> {
            self.saw_ocr.store(options.ocr, Ordering::SeqCst);
            Ok("# Mocked   \r\n\r\nbody".into())
        }

        fn convert_text(&self, _text: &str, _options: &EngineOptions) -> Result<String, ConvertError> {
            Ok("# From engine".into())
        }
    }

    fn canned() -> Arc<Canned> {
        Arc::new(Canned {
            saw_ocr: AtomicBool::new(false),
        })
    }

    #[tokio::test]
    async fn failing_engine_falls_back() {
        let config = ConversionConfig::default();
        let out = convert_text_with(Arc::new(Broken), BOOK, &config).await;

        assert_eq!(out.method, ConversionMethod::Fallback);
        assert_eq!(out.markdown, promote_headings(BOOK));
        assert_eq!(out.markdown, "\n## Chapter One\n\nIt was a dark night.");
        assert_eq!(out.stats.headings_promoted, 1);
    }

    #[tokio::test]
    async fn default_engines_fall_back_on_text() {
        let config = ConversionConfig::default();
        let out = convert_text(BOOK, &config).await;
        assert!(out.method.is_fallback());
        assert_eq!(out.markdown, promote_headings(BOOK));
    }

    #[tokio::test]
    async fn succeeding_engine_output_is_used() {
        let config = ConversionConfig::builder().clean_output(false).build().unwrap();
        let out = convert_text_with(canned(), BOOK, &config).await;
        assert_eq!(out.method, ConversionMethod::Engine("canned".into()));
        assert_eq!(out.markdown, "# From engine");
    }

    #[tokio::test]
    async fn pdf_conversion_cleans_and_passes_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("test.pdf");
        std::fs::write(&pdf, b"%PDF-1.4 fake").unwrap();

        let engine = canned();
        let config = ConversionConfig::default();
        let out = convert_pdf_with(engine.clone(), &pdf, &config).await.unwrap();

        assert_eq!(out.markdown, "# Mocked\n\nbody\n");
        assert_eq!(out.method, ConversionMethod::Engine("canned".into()));
        assert_eq!(out.stats.input_bytes, 13);
        assert!(engine.saw_ocr.load(Ordering::SeqCst));

        let engine = canned();
        let config = ConversionConfig::builder().ocr(false).build().unwrap();
        convert_pdf_with(engine.clone(), &pdf, &config).await.unwrap();
        assert!(!engine.saw_ocr.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn pdf_engine_errors_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("test.pdf");
        std::fs::write(&pdf, b"%PDF-1.4 fake").unwrap();

        let err = convert_pdf_with(Arc::new(Broken), &pdf, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::EngineFailed { .. }));
    }

    #[tokio::test]
    async fn pdf_validation_runs_before_engine() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("document.txt");
        std::fs::write(&txt, "hello").unwrap();

        let err = convert_pdf_with(canned(), &txt, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_user_error());
        assert!(err.to_string().contains(".txt"));
    }

    #[tokio::test]
    async fn source_from_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("book.txt");
        std::fs::write(&txt, BOOK).unwrap();

        let out = convert_source(txt.to_str().unwrap(), &ConversionConfig::default())
            .await
            .unwrap();
        assert!(out.method.is_fallback());
        assert!(out.markdown.contains("## Chapter One"));
        assert!(!out.markdown.contains("License"));
    }

    #[tokio::test]
    async fn write_output_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("nested/dir/book.md");

        convert_to_file("# Book\n", &out_path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "# Book\n");
        assert!(!out_path.with_extension("md.tmp").exists());
    }
}
