//! Pipeline stages surrounding the conversion engine.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ engine ──▶ postprocess
//!   │          │
//!   │          └─ error on text ──▶ fallback (heading promotion)
//!   └─ validate .pdf / load text (file or URL)
//! ```
//!
//! 1. [`input`] — validate a PDF path, or load a text source into memory
//! 2. [`crate::engine`] — the backend that does the real conversion
//! 3. [`postprocess`] — deterministic text-cleanup rules for engine output

pub mod input;
pub mod postprocess;
