//! End-to-end conversions against real engines.
//!
//! The PDFs are generated on the fly, so nothing has to be downloaded. Each
//! test skips itself when its engine is not installed:
//!
//! * pdfium: set `PDFIUM_LIB_PATH` or put the library in the working directory
//! * docling: needs `docling` on `PATH` and `E2E_ENABLED=1` (it is slow)
//!
//! Run with:
//!   PDFIUM_LIB_PATH=./libpdfium.so cargo test --test e2e -- --nocapture

use contextrie_convert::{
    convert_pdf, convert_pdf_with, ConversionConfig, ConversionMethod, ConvertError, EngineKind,
    PageSelection, PageSeparator, PdfiumEngine,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Write a PDF with one Helvetica text line per page.
fn write_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    let n = pages.len();
    // Object layout: 1 catalog, 2 page tree, 3 font, then (page, contents) pairs.
    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), n),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let contents = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            contents.len(),
            contents
        ));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for off in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", off));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));

    let path = dir.join(name);
    std::fs::write(&path, pdf).unwrap();
    path
}

/// Unwrap a conversion result, or return early when pdfium cannot be bound.
macro_rules! skip_without_pdfium {
    ($result:expr) => {{
        match $result {
            Err(ConvertError::PdfiumBindingFailed(reason)) => {
                println!("SKIP — pdfium unavailable: {reason}");
                return;
            }
            other => other,
        }
    }};
}

// ── pdfium ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdfium_extracts_text_layer() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "hello.pdf", &["Hello World"]);

    let config = ConversionConfig::builder()
        .engine(EngineKind::Pdfium)
        .ocr(false)
        .build()
        .unwrap();
    let out = skip_without_pdfium!(convert_pdf(&pdf, &config).await).unwrap();

    assert_eq!(out.method, ConversionMethod::Engine("pdfium".into()));
    assert!(out.markdown.contains("Hello World"), "got: {:?}", out.markdown);
    assert!(out.markdown.ends_with('\n'));
    assert!(out.stats.input_bytes > 0);
}

#[tokio::test]
async fn pdfium_page_selection_and_separator() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "three.pdf", &["Alpha", "Bravo", "Charlie"]);

    let config = ConversionConfig::builder()
        .pages(PageSelection::Set(vec![1, 3]))
        .page_separator(PageSeparator::Comment)
        .build()
        .unwrap();
    let out = skip_without_pdfium!(
        convert_pdf_with(Arc::new(PdfiumEngine::new()), &pdf, &config).await
    )
    .unwrap();

    assert!(out.markdown.contains("Alpha"));
    assert!(!out.markdown.contains("Bravo"));
    assert!(out.markdown.contains("<!-- page 3 -->"));
    assert!(out.markdown.contains("Charlie"));
}

#[tokio::test]
async fn pdfium_page_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "one.pdf", &["Only page"]);

    let config = ConversionConfig::builder()
        .engine(EngineKind::Pdfium)
        .pages(PageSelection::Single(5))
        .build()
        .unwrap();
    let err = skip_without_pdfium!(convert_pdf(&pdf, &config).await).unwrap_err();

    assert!(
        matches!(err, ConvertError::PageOutOfRange { total: 1, .. }),
        "got: {err}"
    );
    assert!(err.to_string().contains("'5'"), "got: {err}");
}

#[tokio::test]
async fn pdfium_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("garbage.pdf");
    std::fs::write(&pdf, b"this is not a pdf at all").unwrap();

    let config = ConversionConfig::builder()
        .engine(EngineKind::Pdfium)
        .build()
        .unwrap();
    let err = skip_without_pdfium!(convert_pdf(&pdf, &config).await).unwrap_err();

    assert!(matches!(err, ConvertError::CorruptPdf { .. }), "got: {err}");
}

// ── docling ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn docling_converts_without_ocr() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run docling e2e tests");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "hello.pdf", &["Hello Docling"]);

    let config = ConversionConfig::builder().ocr(false).build().unwrap();

    match convert_pdf(&pdf, &config).await {
        Err(ConvertError::EngineUnavailable { hint, .. }) => {
            println!("SKIP — docling not installed ({hint})");
        }
        Ok(out) => {
            assert_eq!(out.method, ConversionMethod::Engine("docling".into()));
            assert!(out.markdown.contains("Hello Docling"), "got: {:?}", out.markdown);
        }
        Err(e) => panic!("docling conversion failed: {e}"),
    }
}
