//! Pipeline stages for PDF-to-PPTX conversion.
//!
//! Each submodule implements one step; [`driver`] strings them together.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ pdfium ──▶ classify ──┬─▶ render ──▶ encode ──┐
//! (path)   (PageSource) (pairs)   └─▶ notes ──────────────┴─▶ package
//! ```
//!
//! 1. [`input`]: reject paths that are missing, unreadable or not a PDF
//! 2. [`pdfium`]: open the document behind the [`document::PageSource`] trait
//! 3. [`classify`]: split pages into (slide, notes) pairs, lazily
//! 4. [`render`]: rasterise a slide page at the configured DPI; [`encode`]
//!    turns the bitmap into PNG bytes
//! 5. [`notes`]: plain text for the notes field
//! 6. [`driver`]: the state machine feeding [`crate::package`]

pub mod classify;
pub mod document;
pub mod driver;
pub mod encode;
pub mod input;
pub mod notes;
pub mod pdfium;
pub mod render;
