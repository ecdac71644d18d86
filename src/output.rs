//! Result types returned by the `convert*` entry points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which path produced the Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "engine", rename_all = "lowercase")]
pub enum ConversionMethod {
    /// The named engine converted the input.
    Engine(String),
    /// The engine failed; the heading-promotion fallback was used.
    Fallback,
}

impl ConversionMethod {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ConversionMethod::Fallback)
    }
}

impl fmt::Display for ConversionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMethod::Engine(name) => write!(f, "{name}"),
            ConversionMethod::Fallback => f.write_str("heading-promotion fallback"),
        }
    }
}

/// Counters describing one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Headings created by the fallback. Zero for engine output.
    pub headings_promoted: usize,
    pub duration_ms: u64,
}

/// The converted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub markdown: String,
    pub method: ConversionMethod,
    pub stats: ConversionStats,
}
