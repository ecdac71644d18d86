//! Docling engine: shell out to the `docling` command-line converter.
//!
//! Docling does layout analysis, table structure recovery and OCR, which is
//! why it is the engine to use for scanned documents. It is a Python tool, so
//! it runs as a subprocess:
//!
//! ```text
//! docling <input.pdf> --to md --output <tempdir> [--no-ocr]
//! ```
//!
//! and writes `<tempdir>/<stem>.md`. Subprocess output goes to a log file in
//! the same temp directory, so a chatty run cannot fill a pipe and stall; on
//! failure the tail of that log becomes the error detail.

use super::{ConversionEngine, EngineOptions};
use crate::error::ConvertError;
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lines of subprocess log kept in an error message.
const LOG_TAIL_LINES: usize = 20;

pub struct DoclingEngine {
    program: String,
    prefix_args: Vec<String>,
}

impl DoclingEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    /// Arguments placed before the input path, e.g. `["-m", "docling.cli.main"]`
    /// when `program` is a Python interpreter.
    pub fn with_prefix_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn engine_error(&self, detail: impl Into<String>) -> ConvertError {
        ConvertError::EngineFailed {
            engine: self.name().to_string(),
            detail: detail.into(),
        }
    }
}

impl Default for DoclingEngine {
    fn default() -> Self {
        Self::new("docling")
    }
}

impl ConversionEngine for DoclingEngine {
    fn name(&self) -> &str {
        "docling"
    }

    fn convert_pdf(&self, path: &Path, options: &EngineOptions) -> Result<String, ConvertError> {
        if !options.pages.is_all() {
            warn!("docling converts whole documents; page selection is ignored");
        }
        if options.password.is_some() {
            warn!("docling does not accept a PDF password; it is ignored");
        }

        let out_dir = TempDir::new().map_err(|e| ConvertError::Internal(format!("tempdir: {e}")))?;
        let log_path = out_dir.path().join("docling.log");
        let log = File::create(&log_path)
            .map_err(|e| ConvertError::Internal(format!("docling log file: {e}")))?;
        let log_err = log
            .try_clone()
            .map_err(|e| ConvertError::Internal(format!("docling log file: {e}")))?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args)
            .arg(path)
            .args(["--to", "md", "--output"])
            .arg(out_dir.path());
        if !options.ocr {
            cmd.arg("--no-ocr");
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err));

        info!(
            "Running {} on {} (ocr={})",
            self.program,
            path.display(),
            options.ocr
        );

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConvertError::EngineUnavailable {
                    engine: self.name().to_string(),
                    hint: format!(
                        "'{}' was not found on PATH.\nInstall it with: pip install docling",
                        self.program
                    ),
                }
            } else {
                self.engine_error(format!("failed to start '{}': {e}", self.program))
            }
        })?;

        // A timeout too large to represent as an Instant means no deadline.
        let deadline = Instant::now().checked_add(Duration::from_secs(options.timeout_secs));
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if deadline.is_some_and(|d| Instant::now() >= d) => {
                    // The child may exit between try_wait and kill; either way it is gone.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ConvertError::EngineTimeout {
                        engine: self.name().to_string(),
                        secs: options.timeout_secs,
                    });
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(self.engine_error(format!("waiting for docling: {e}"))),
            }
        };

        if !status.success() {
            let tail = log_tail(&log_path);
            return Err(self.engine_error(if tail.is_empty() {
                format!("{status}")
            } else {
                format!("{status}\n{tail}")
            }));
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let md_path = out_dir.path().join(format!("{stem}.md"));

        let markdown = std::fs::read_to_string(&md_path).map_err(|e| {
            self.engine_error(format!(
                "expected output {} was not produced: {e}",
                md_path.display()
            ))
        })?;

        if markdown.trim().is_empty() {
            return Err(self.engine_error("produced empty output (possibly image-only PDF with OCR disabled)"));
        }

        debug!("docling produced {} bytes", markdown.len());
        Ok(markdown)
    }
}

/// Last [`LOG_TAIL_LINES`] non-empty lines of the subprocess log.
fn log_tail(path: &Path) -> String {
    let Ok(log) = std::fs::read_to_string(path) else {
        return String::new();
    };
    let lines: Vec<&str> = log.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    lines[start..].join("\n")
}
