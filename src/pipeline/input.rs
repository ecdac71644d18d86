//! Input resolution: validate PDF paths and load plain-text sources.
//!
//! PDF inputs are only checked, never read here: the engine opens them. Text
//! inputs are loaded into memory, either from disk or over HTTP, because the
//! fallback converter works on a single string.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Validate that `path` names an existing, readable file with a `.pdf`
/// extension (case-insensitive).
///
/// Existence is checked first, so a missing `notes.txt` reports
/// [`ConvertError::FileNotFound`] rather than a type error.
pub fn validate_pdf_path(path: impl AsRef<Path>) -> Result<PathBuf, ConvertError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(ConvertError::FileNotFound { path });
    }

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        let suffix = suffix_of(&path);
        return Err(ConvertError::InvalidFileType { path, suffix });
    }

    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied { path });
        }
        Err(_) => return Err(ConvertError::FileNotFound { path }),
    }

    debug!("Validated PDF: {}", path.display());
    Ok(path)
}

/// The extension with its leading dot, or `""` when there is none.
fn suffix_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Load a plain-text source: download it when `input` is a URL, otherwise
/// read the local file.
pub async fn resolve_text_source(input: &str, timeout_secs: u64) -> Result<String, ConvertError> {
    if is_url(input) {
        download_text(input, timeout_secs).await
    } else {
        read_local_text(input).await
    }
}

async fn read_local_text(path_str: &str) -> Result<String, ConvertError> {
    let path = PathBuf::from(path_str);

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            ConvertError::PermissionDenied { path: path.clone() }
        }
        _ => ConvertError::ReadFailed {
            path: path.clone(),
            source: e,
        },
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Download a URL and decode the body as UTF-8.
async fn download_text(url: &str, timeout_secs: u64) -> Result<String, ConvertError> {
    info!("Downloading text from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ConvertError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let map_send_err = |e: reqwest::Error| {
        if e.is_timeout() {
            ConvertError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ConvertError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(map_send_err)?;

    if !response.status().is_success() {
        return Err(ConvertError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(map_send_err)?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
